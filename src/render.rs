// DistWatch - Watch Face Renderer
//
// Draws the face with embedded-graphics primitives onto any `DrawTarget`:
// the SSD1306 frame buffer on the watch, an in-memory `Framebuffer` in the
// simulator and tests. Angles follow the watch convention (0° at twelve
// o'clock, clockwise) and are converted to embedded-graphics angles here.

use core::convert::Infallible;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::{BinaryColor, Rgb888};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Arc, Circle, Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use crate::config::{chart_height, FaceLayout};
use crate::histogram::StepHistogram;
use crate::ring::{RingState, RAMP_LEN};

/// Colours for every element of the face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette<C> {
    pub background: C,
    pub dots: C,
    pub ramp: [C; RAMP_LEN],
    pub complete: C,
    pub distance: C,
    pub speed: C,
    pub chart_label: C,
    pub chart_outline: C,
    pub chart_grid: C,
    pub bar: C,
    pub bar_highlight: C,
}

impl Palette<Rgb888> {
    pub const COLOR: Self = Self {
        background: Rgb888::BLACK,
        dots: Rgb888::new(0x55, 0x55, 0x55),
        ramp: [
            Rgb888::new(0xFF, 0x00, 0x00), // red
            Rgb888::new(0xFF, 0x55, 0x00), // orange
            Rgb888::new(0xFF, 0xAA, 0x00), // chrome yellow
            Rgb888::new(0xFF, 0xFF, 0x00), // yellow
            Rgb888::new(0xAA, 0xFF, 0x00), // spring bud
            Rgb888::new(0x00, 0xFF, 0x00), // green
        ],
        complete: Rgb888::new(0x00, 0x00, 0xFF),
        distance: Rgb888::WHITE,
        speed: Rgb888::new(0xFF, 0xFF, 0x00),
        chart_label: Rgb888::WHITE,
        chart_outline: Rgb888::new(0xAA, 0xAA, 0xAA),
        chart_grid: Rgb888::new(0x55, 0x55, 0x55),
        bar: Rgb888::WHITE,
        bar_highlight: Rgb888::new(0x00, 0xFF, 0x00),
    };
}

impl Palette<BinaryColor> {
    pub const MONO: Self = Self {
        background: BinaryColor::Off,
        dots: BinaryColor::On,
        ramp: [BinaryColor::On; RAMP_LEN],
        complete: BinaryColor::On,
        distance: BinaryColor::On,
        speed: BinaryColor::On,
        chart_label: BinaryColor::On,
        chart_outline: BinaryColor::On,
        chart_grid: BinaryColor::On,
        bar: BinaryColor::On,
        bar_highlight: BinaryColor::On,
    };
}

/// Everything the renderer needs from the app for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FaceView<'a> {
    pub ring: RingState,
    pub sweep_deg: (i32, i32),
    pub distance: &'a str,
    pub speed: &'a str,
    pub chart_label: &'a str,
    pub histogram: Option<&'a StepHistogram>,
}

pub struct WatchFace<'a, C> {
    layout: &'a FaceLayout,
    palette: &'a Palette<C>,
}

impl<'a, C: PixelColor> WatchFace<'a, C> {
    pub fn new(layout: &'a FaceLayout, palette: &'a Palette<C>) -> Self {
        Self { layout, palette }
    }

    /// Redraw the whole face.
    pub fn draw<D>(&self, view: &FaceView<'_>, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = C>,
    {
        target.clear(self.palette.background)?;
        self.draw_dots(view.sweep_deg, target)?;
        self.draw_ring(view.ring, view.sweep_deg, target)?;
        self.draw_text(view.speed, self.layout.speed_text, self.layout.speed_font, self.palette.speed, Alignment::Center, target)?;
        self.draw_text(view.distance, self.layout.distance_text, self.layout.distance_font, self.palette.distance, Alignment::Center, target)?;

        if let (Some(chart), Some(histogram)) = (self.layout.chart, view.histogram) {
            self.draw_chart(chart, histogram, target)?;
            self.draw_text(view.chart_label, self.layout.chart_label, self.layout.chart_label_font, self.palette.chart_label, Alignment::Right, target)?;
        }
        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        Rectangle::new(Point::zero(), self.layout.size)
    }

    fn draw_dots<D>(&self, (start, end): (i32, i32), target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = C>,
    {
        let (center, diameter) = fit_circle(self.bounds(), self.layout.dots_inset);
        let radius = diameter as f32 / 2.0;
        let count = self.layout.dot_count.max(1) as i32;
        let style = PrimitiveStyle::with_fill(self.palette.dots);

        for i in 0..=count {
            let deg = start + i * (end - start) / count;
            Circle::with_center(polar(center, radius, deg), self.layout.dot_diameter)
                .into_styled(style)
                .draw(target)?;
        }
        Ok(())
    }

    fn draw_ring<D>(&self, ring: RingState, (start, _): (i32, i32), target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = C>,
    {
        let color = match ring {
            RingState::Approaching { ramp_index, .. } => self.palette.ramp[ramp_index.min(RAMP_LEN - 1)],
            RingState::Complete { .. } => self.palette.complete,
        };
        let sweep = ring.end_deg() - start;
        if sweep <= 0 {
            return Ok(());
        }

        // The stroke is centred on the arc, so pull the arc in by half the
        // ring width to keep the outer edge on the inset bounds.
        let width = self.layout.ring_width;
        let (center, outer) = fit_circle(self.bounds(), self.layout.ring_inset);
        let diameter = outer.saturating_sub(width);

        Arc::with_center(
            center,
            diameter,
            Angle::from_degrees((start - 90) as f32),
            Angle::from_degrees(sweep as f32),
        )
        .into_styled(PrimitiveStyle::with_stroke(color, width))
        .draw(target)
    }

    fn draw_text<D>(
        &self,
        text: &str,
        anchor: Point,
        font: &'static embedded_graphics::mono_font::MonoFont<'static>,
        color: C,
        alignment: Alignment,
        target: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = C>,
    {
        let text_style = TextStyleBuilder::new()
            .alignment(alignment)
            .baseline(Baseline::Top)
            .build();
        Text::with_text_style(text, anchor, MonoTextStyle::new(font, color), text_style).draw(target)?;
        Ok(())
    }

    fn draw_chart<D>(&self, chart: Rectangle, histogram: &StepHistogram, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = C>,
    {
        let origin = chart.top_left;
        let w = chart.size.width as i32;
        let h = chart.size.height as i32;

        // Grid
        chart
            .into_styled(PrimitiveStyle::with_stroke(self.palette.chart_outline, 1))
            .draw(target)?;
        let grid = PrimitiveStyle::with_stroke(self.palette.chart_grid, 1);
        Line::new(origin + Point::new(0, h / 2), origin + Point::new(w, h / 2))
            .into_styled(grid)
            .draw(target)?;
        for x in [30, 60, 90] {
            Line::new(origin + Point::new(x, 0), origin + Point::new(x, h))
                .into_styled(grid)
                .draw(target)?;
        }

        // Bars
        let chart_h = chart_height(self.layout);
        for (slot, bar) in histogram.bars(chart_h) {
            if bar == 0 {
                continue;
            }
            let color = if bar > chart_h / 2 {
                self.palette.bar_highlight
            } else {
                self.palette.bar
            };
            let x = slot as i32 * self.layout.bar_pitch as i32;
            Rectangle::new(origin + Point::new(x, h - bar as i32), Size::new(1, bar))
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(target)?;
        }
        Ok(())
    }
}

/// Centre and diameter of the largest circle inside `bounds` shrunk by `inset`.
pub fn fit_circle(bounds: Rectangle, inset: u32) -> (Point, u32) {
    let inner = bounds.offset(-(inset as i32));
    (inner.center(), inner.size.width.min(inner.size.height))
}

/// Point at `deg` (0° up, clockwise) on a circle around `center`.
pub fn polar(center: Point, radius: f32, deg: i32) -> Point {
    let rad = (deg as f32).to_radians();
    center + Point::new((radius * rad.sin()).round() as i32, -(radius * rad.cos()).round() as i32)
}

/// Heap-backed draw target for the simulator and tests.
#[derive(Debug, Clone)]
pub struct Framebuffer<C> {
    size: Size,
    pixels: Vec<C>,
}

impl<C: PixelColor> Framebuffer<C> {
    pub fn new(size: Size, fill: C) -> Self {
        Self {
            size,
            pixels: vec![fill; (size.width * size.height) as usize],
        }
    }

    fn index(&self, p: Point) -> Option<usize> {
        let (x, y) = (u32::try_from(p.x).ok()?, u32::try_from(p.y).ok()?);
        (x < self.size.width && y < self.size.height).then(|| (y * self.size.width + x) as usize)
    }

    pub fn pixel(&self, p: Point) -> Option<C> {
        self.index(p).map(|i| self.pixels[i])
    }

    pub fn count(&self, color: C) -> usize {
        self.pixels.iter().filter(|&&c| c == color).count()
    }
}

impl<C: PixelColor> OriginDimensions for Framebuffer<C> {
    fn size(&self) -> Size {
        self.size
    }
}

impl<C: PixelColor> DrawTarget for Framebuffer<C> {
    type Color = C;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, color) in pixels {
            if let Some(i) = self.index(p) {
                self.pixels[i] = color;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OLED_LAYOUT, WRIST_LAYOUT};
    use crate::health::{HealthMetric, HealthSource, MinuteSample};

    fn c(v: u8) -> Rgb888 {
        Rgb888::new(v, v, v)
    }

    /// Every element in its own colour, so pixels can be attributed.
    const DISTINCT: Palette<Rgb888> = Palette {
        background: Rgb888::new(0, 0, 0),
        dots: Rgb888::new(1, 0, 0),
        ramp: [
            Rgb888::new(10, 0, 0),
            Rgb888::new(11, 0, 0),
            Rgb888::new(12, 0, 0),
            Rgb888::new(13, 0, 0),
            Rgb888::new(14, 0, 0),
            Rgb888::new(15, 0, 0),
        ],
        complete: Rgb888::new(20, 0, 0),
        distance: Rgb888::new(30, 0, 0),
        speed: Rgb888::new(31, 0, 0),
        chart_label: Rgb888::new(32, 0, 0),
        chart_outline: Rgb888::new(40, 0, 0),
        chart_grid: Rgb888::new(41, 0, 0),
        bar: Rgb888::new(50, 0, 0),
        bar_highlight: Rgb888::new(51, 0, 0),
    };

    struct OneBar(u16);

    impl HealthSource for OneBar {
        fn sum_today(&self, _metric: HealthMetric) -> i32 {
            0
        }

        fn minute_history(&self, buf: &mut [MinuteSample], _start: i64, _end: i64) -> usize {
            buf[..10].fill(MinuteSample::INVALID);
            buf[5] = MinuteSample::valid(self.0);
            10
        }

        fn metric_accessible(&self, _metric: HealthMetric, _start: i64, _end: i64) -> bool {
            true
        }
    }

    fn view(ring: RingState, histogram: Option<&StepHistogram>) -> FaceView<'_> {
        FaceView {
            ring,
            sweep_deg: (-120, 120),
            distance: "1,234m",
            speed: "3,60km/h",
            chart_label: "100",
            histogram,
        }
    }

    fn render(view: &FaceView<'_>) -> Framebuffer<Rgb888> {
        let mut fb = Framebuffer::new(WRIST_LAYOUT.size, c(0));
        WatchFace::new(&WRIST_LAYOUT, &DISTINCT).draw(view, &mut fb).unwrap();
        fb
    }

    #[test]
    fn polar_points_follow_watch_convention() {
        let center = Point::new(50, 50);
        assert_eq!(polar(center, 10.0, 0), Point::new(50, 40));
        assert_eq!(polar(center, 10.0, 90), Point::new(60, 50));
        assert_eq!(polar(center, 10.0, 180), Point::new(50, 60));
        assert_eq!(polar(center, 10.0, -90), Point::new(40, 50));
    }

    #[test]
    fn fit_circle_uses_short_side() {
        let (center, d) = fit_circle(Rectangle::new(Point::zero(), Size::new(144, 168)), 2);
        assert_eq!(d, 140);
        assert_eq!(center, Point::new(71, 83));
    }

    #[test]
    fn approaching_ring_uses_ramp_colour() {
        let fb = render(&view(RingState::Approaching { ramp_index: 3, end_deg: 0 }, None));
        assert!(fb.count(DISTINCT.ramp[3]) > 100);
        assert_eq!(fb.count(DISTINCT.complete), 0);
        assert!(fb.count(DISTINCT.dots) > 0);
        assert!(fb.count(DISTINCT.distance) > 0);
        assert!(fb.count(DISTINCT.speed) > 0);
    }

    #[test]
    fn empty_progress_draws_no_arc() {
        let fb = render(&view(RingState::Approaching { ramp_index: 0, end_deg: -120 }, None));
        assert_eq!(fb.count(DISTINCT.ramp[0]), 0);
    }

    #[test]
    fn complete_ring_is_longer_than_partial() {
        let partial = render(&view(RingState::Approaching { ramp_index: 3, end_deg: 0 }, None));
        let full = render(&view(RingState::Complete { end_deg: 120 }, None));
        assert!(full.count(DISTINCT.complete) > partial.count(DISTINCT.ramp[3]));
        assert_eq!(full.count(DISTINCT.ramp[3]), 0);
    }

    #[test]
    fn tall_bars_are_highlighted() {
        let mut histogram = StepHistogram::new();
        histogram.refresh(0, &OneBar(100));
        let fb = render(&view(RingState::Complete { end_deg: 120 }, Some(&histogram)));
        // One full-height, one pixel wide bar at slot 5.
        assert_eq!(fb.count(DISTINCT.bar_highlight), 38);
        assert_eq!(fb.count(DISTINCT.bar), 0);
        assert_eq!(fb.pixel(Point::new(18 + 10, 130)), Some(DISTINCT.bar_highlight));
        assert!(fb.count(DISTINCT.chart_outline) > 0);
        assert!(fb.count(DISTINCT.chart_label) > 0);
    }

    #[test]
    fn short_bars_use_base_colour() {
        let mut histogram = StepHistogram::new();
        histogram.refresh(0, &OneBar(10));
        let fb = render(&view(RingState::Complete { end_deg: 120 }, Some(&histogram)));
        // 38 * 10 / 50
        assert_eq!(fb.count(DISTINCT.bar), 7);
        assert_eq!(fb.count(DISTINCT.bar_highlight), 0);
    }

    #[test]
    fn mono_face_fits_the_oled() {
        let mut fb = Framebuffer::new(OLED_LAYOUT.size, BinaryColor::Off);
        let view = FaceView {
            ring: RingState::Approaching { ramp_index: 2, end_deg: 180 },
            sweep_deg: (0, 360),
            distance: "850m",
            speed: "--:--/km",
            chart_label: "",
            histogram: None,
        };
        WatchFace::new(&OLED_LAYOUT, &Palette::MONO).draw(&view, &mut fb).unwrap();
        assert!(fb.count(BinaryColor::On) > 0);
    }
}
