//! Drawing primitives of an addressable RGB565 panel.
//!
//! A transport only has to provide [`DisplaySurface::set_draw_region`] and
//! [`DisplaySurface::stream_pixel_color`]; shapes are built on top of those two
//! and can be overridden when the controller has faster native commands.

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Circle, ContainsPoint, PrimitiveStyleBuilder, Rectangle, StrokeAlignment},
};

pub trait DisplaySurface {
    type Error;

    /// Visible panel size in pixels.
    fn size(&self) -> Size;

    /// Selects the window the following pixel stream fills, row-major.
    fn set_draw_region(&mut self, region: Rectangle) -> Result<(), Self::Error>;

    /// Writes the next pixel of the current region.
    fn stream_pixel_color(&mut self, color: Rgb565) -> Result<(), Self::Error>;

    fn bounds(&self) -> Rectangle {
        Rectangle::new(Point::zero(), self.size())
    }

    /// Fills the rectangle spanned by two inclusive corners.
    ///
    /// The rectangle is clipped to the panel; nothing is sent when no part of
    /// it is visible.
    fn fill_rectangle(
        &mut self,
        start: Point,
        end: Point,
        color: Rgb565,
    ) -> Result<(), Self::Error> {
        let area = Rectangle::with_corners(start, end).intersection(&self.bounds());
        fill_region(self, area, color)
    }

    /// Draws a ring whose outer edge has `radius` and which extends
    /// `thickness` pixels inwards. A zero radius draws nothing.
    fn draw_ring_outline(
        &mut self,
        center: Point,
        radius: u32,
        thickness: u32,
        color: Rgb565,
    ) -> Result<(), Self::Error> {
        if radius == 0 || thickness == 0 {
            return Ok(());
        }
        let style = PrimitiveStyleBuilder::new()
            .stroke_color(color)
            .stroke_width(thickness)
            .stroke_alignment(StrokeAlignment::Inside)
            .build();

        let mut runs = RunWriter { surface: self, run: None };
        Circle::with_center(center, radius * 2 + 1)
            .into_styled(style)
            .draw(&mut runs)?;
        runs.flush()
    }

    /// Fills the whole panel, one streamed pixel at a time.
    fn clear_to_color(&mut self, color: Rgb565) -> Result<(), Self::Error> {
        let bounds = self.bounds();
        fill_region(self, bounds, color)
    }
}

fn fill_region<S>(surface: &mut S, area: Rectangle, color: Rgb565) -> Result<(), S::Error>
where
    S: DisplaySurface + ?Sized,
{
    if area.is_zero_sized() {
        return Ok(());
    }
    surface.set_draw_region(area)?;
    for _ in 0..area.size.width * area.size.height {
        surface.stream_pixel_color(color)?;
    }
    Ok(())
}

/// Collects rasterized pixels into horizontal runs, one region per run.
struct RunWriter<'a, S: DisplaySurface + ?Sized> {
    surface: &'a mut S,
    run: Option<(Point, u32, Rgb565)>,
}

impl<S: DisplaySurface + ?Sized> RunWriter<'_, S> {
    fn flush(&mut self) -> Result<(), S::Error> {
        match self.run.take() {
            Some((start, len, color)) => {
                fill_region(&mut *self.surface, Rectangle::new(start, Size::new(len, 1)), color)
            }
            None => Ok(()),
        }
    }
}

impl<S: DisplaySurface + ?Sized> OriginDimensions for RunWriter<'_, S> {
    fn size(&self) -> Size {
        self.surface.size()
    }
}

impl<S: DisplaySurface + ?Sized> DrawTarget for RunWriter<'_, S> {
    type Color = Rgb565;
    type Error = S::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bounds = self.bounding_box();
        for Pixel(point, color) in pixels {
            if !bounds.contains(point) {
                continue;
            }
            match self.run {
                Some((start, len, run_color))
                    if start.y == point.y
                        && start.x + len as i32 == point.x
                        && run_color == color =>
                {
                    self.run = Some((start, len + 1, run_color));
                }
                _ => {
                    self.flush()?;
                    self.run = Some((point, 1, color));
                }
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.flush()?;
        let area = area.intersection(&self.bounding_box());
        fill_region(&mut *self.surface, area, color)
    }
}
