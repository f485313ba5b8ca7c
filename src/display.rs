use embedded_graphics::{
    geometry::{OriginDimensions, Point, Size},
    primitives::Rectangle,
};

use crate::{
    config::{DISPLAY_H, DISPLAY_W},
    error::AppError,
};

pub const DISPLAY_SIZE: Size = Size::new(DISPLAY_W, DISPLAY_H);

/// The full drawing area a renderer must address.
pub fn canvas() -> Rectangle {
    Rectangle::new(Point::zero(), DISPLAY_SIZE)
}

/// Whether `area` lies entirely on the canvas.
pub fn fits(area: &Rectangle) -> bool {
    let canvas = canvas();
    if area.size.width == 0 || area.size.height == 0 {
        return canvas.contains(area.top_left);
    }
    match area.bottom_right() {
        Some(bottom_right) => canvas.contains(area.top_left) && canvas.contains(bottom_right),
        None => false,
    }
}

/// Check that a draw target matches the configured canvas before rendering onto it.
pub fn check_surface<D: OriginDimensions>(target: &D) -> Result<(), AppError> {
    let size = target.size();
    if size != DISPLAY_SIZE {
        log::error!(
            "Display surface is {}x{}, expected {}x{}",
            size.width,
            size.height,
            DISPLAY_W,
            DISPLAY_H
        );
        return Err(AppError::DisplayMismatch {
            width: size.width,
            height: size.height,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Surface(Size);

    impl OriginDimensions for Surface {
        fn size(&self) -> Size {
            self.0
        }
    }

    #[test]
    fn canvas_is_128_by_64() {
        assert_eq!(canvas().size, Size::new(128, 64));
        assert_eq!(canvas().bottom_right(), Some(Point::new(127, 63)));
    }

    #[test]
    fn areas_on_and_off_canvas() {
        assert!(fits(&canvas()));
        assert!(fits(&Rectangle::new(Point::new(64, 32), Size::new(64, 32))));
        assert!(!fits(&Rectangle::new(Point::new(64, 32), Size::new(65, 32))));
        assert!(!fits(&Rectangle::new(Point::new(-1, 0), Size::new(10, 10))));
    }

    #[test]
    fn surface_must_match_canvas() {
        assert_eq!(check_surface(&Surface(Size::new(128, 64))), Ok(()));
        assert_eq!(
            check_surface(&Surface(Size::new(296, 128))),
            Err(AppError::DisplayMismatch {
                width: 296,
                height: 128
            })
        );
    }
}
