//! Text drawing shared by the apps

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use handheld_core::nav::ScreenFault;
use handheld_display::FrameBuffer;

pub use embedded_graphics::mono_font::ascii::{FONT_10X20 as LARGE, FONT_6X10 as SMALL};
/// Large font with Latin-1 glyphs (degree sign)
pub use embedded_graphics::mono_font::iso_8859_1::FONT_10X20 as LARGE_LATIN1;

/// Left-aligned text with its top-left corner at `(x, y)`
pub fn text(
    frame: &mut FrameBuffer,
    s: &str,
    x: i32,
    y: i32,
    font: &MonoFont<'_>,
    color: Rgb888,
) -> Result<(), ScreenFault> {
    Text::with_baseline(s, Point::new(x, y), MonoTextStyle::new(font, color), Baseline::Top)
        .draw(frame)?;
    Ok(())
}

/// Text centred horizontally on the frame, vertically on `y`
pub fn centered(
    frame: &mut FrameBuffer,
    s: &str,
    y: i32,
    font: &MonoFont<'_>,
    color: Rgb888,
) -> Result<(), ScreenFault> {
    let style = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build();
    let cx = frame.width() as i32 / 2;
    Text::with_text_style(s, Point::new(cx, y), MonoTextStyle::new(font, color), style)
        .draw(frame)?;
    Ok(())
}

/// Capitalize the first letter of each word, lowercase the rest
pub fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Check whether any pixel in the rectangle has `color`
#[cfg(test)]
pub fn any_pixel(frame: &FrameBuffer, x0: u16, y0: u16, w: u16, h: u16, color: Rgb888) -> bool {
    (y0..y0 + h).any(|y| (x0..x0 + w).any(|x| frame.pixel(x, y) == Some(color)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_lands_at_position() {
        let mut frame = FrameBuffer::new(240, 320);
        let red = Rgb888::new(255, 0, 0);
        text(&mut frame, "X", 10, 10, &LARGE, red).unwrap();
        assert!(any_pixel(&frame, 10, 10, 10, 20, red));
        assert!(!any_pixel(&frame, 40, 0, 200, 320, red));
    }

    #[test]
    fn test_centered_is_symmetric() {
        let mut frame = FrameBuffer::new(240, 320);
        let white = Rgb888::new(255, 255, 255);
        centered(&mut frame, "II", 100, &LARGE, white).unwrap();
        assert!(any_pixel(&frame, 100, 85, 40, 30, white));
        assert!(!any_pixel(&frame, 0, 85, 90, 30, white));
        assert!(!any_pixel(&frame, 150, 85, 90, 30, white));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("light RAIN"), "Light Rain");
        assert_eq!(title_case("snake"), "Snake");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_latin1_degree_sign() {
        let mut frame = FrameBuffer::new(240, 320);
        let white = Rgb888::new(255, 255, 255);
        text(&mut frame, "\u{b0}", 0, 0, &LARGE_LATIN1, white).unwrap();
        assert!(any_pixel(&frame, 0, 0, 10, 20, white));
    }
}
