//! Two-wedge pie chart geometry.
//!
//! Angles are measured clockwise from 12 o'clock. SVG's y axis points down,
//! so a clockwise sweep on screen is SVG sweep flag 1.

use std::f64::consts::PI;

use crate::config::GenderRatio;
use crate::render::{esc, fmt_number};

pub const RADIUS: f64 = 80.0;
pub const CENTER_X: f64 = 100.0;
pub const CENTER_Y: f64 = 100.0;

pub const MALE_FILL: &str = "#001f3f";
pub const FEMALE_FILL: &str = "#000000";

/// One filled sector of the chart.
#[derive(PartialEq, Debug, Clone)]
pub struct Wedge {
    pub label: &'static str,
    pub fill: &'static str,
    /// Degrees from 12 o'clock where the wedge begins.
    pub start_degrees: f64,
    pub sweep_degrees: f64,
}

impl Wedge {
    pub fn large_arc(&self) -> bool {
        self.sweep_degrees > 180.0
    }

    /// The SVG path data for this wedge.
    pub fn path(&self) -> String {
        let (sx, sy) = point_at(self.start_degrees);
        if self.sweep_degrees >= 360.0 {
            // Identical arc endpoints draw nothing, so a full circle is two halves.
            let (mx, my) = point_at(self.start_degrees + 180.0);
            return format!(
                "M {cx} {cy} L {sx} {sy} A {r} {r} 0 0 1 {mx} {my} A {r} {r} 0 0 1 {sx} {sy} Z",
                cx = fmt_number(CENTER_X),
                cy = fmt_number(CENTER_Y),
                r = fmt_number(RADIUS),
                sx = fmt_number(sx),
                sy = fmt_number(sy),
                mx = fmt_number(mx),
                my = fmt_number(my),
            );
        }
        let (ex, ey) = point_at(self.start_degrees + self.sweep_degrees);
        format!(
            "M {cx} {cy} L {sx} {sy} A {r} {r} 0 {large} 1 {ex} {ey} Z",
            cx = fmt_number(CENTER_X),
            cy = fmt_number(CENTER_Y),
            r = fmt_number(RADIUS),
            sx = fmt_number(sx),
            sy = fmt_number(sy),
            large = if self.large_arc() { 1 } else { 0 },
            ex = fmt_number(ex),
            ey = fmt_number(ey),
        )
    }
}

/// The point on the circle at `degrees` clockwise from 12 o'clock.
pub fn point_at(degrees: f64) -> (f64, f64) {
    let rad = degrees * PI / 180.0 - PI / 2.0;
    (CENTER_X + RADIUS * rad.cos(), CENTER_Y + RADIUS * rad.sin())
}

pub fn percent_to_degrees(percent: f64) -> f64 {
    percent / 100.0 * 360.0
}

/// Computes the wedges for a male/female split. The input is not validated.
///
/// The female sweep is whatever remains of the circle, so the two sweeps
/// always add up to 360. Wedges with no sweep are left out.
pub fn pie_wedges(ratio: &GenderRatio) -> Vec<Wedge> {
    let male_sweep = percent_to_degrees(ratio.male);
    let female_sweep = 360.0 - male_sweep;
    [
        Wedge {
            label: "Male",
            fill: MALE_FILL,
            start_degrees: 0.0,
            sweep_degrees: male_sweep,
        },
        Wedge {
            label: "Female",
            fill: FEMALE_FILL,
            start_degrees: male_sweep,
            sweep_degrees: female_sweep,
        },
    ]
    .into_iter()
    .filter(|w| w.sweep_degrees > 0.0)
    .collect()
}

pub fn pie_chart_svg(ratio: &GenderRatio) -> String {
    let mut svg = String::from("<svg class=\"pie-chart\" viewBox=\"0 0 200 200\">");
    for w in pie_wedges(ratio) {
        svg.push_str(&format!(
            "<path d=\"{}\" fill=\"{}\"><title>{}</title></path>",
            w.path(),
            w.fill,
            esc(w.label)
        ));
    }
    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ratio(male: f64) -> GenderRatio {
        GenderRatio {
            male,
            female: 100.0 - male,
        }
    }

    #[test]
    fn even_split_is_two_half_circles() {
        let ws = pie_wedges(&GenderRatio::EVEN);
        assert_eq!(ws.len(), 2);
        assert_eq!(ws[0].path(), "M 100 100 L 100 20 A 80 80 0 0 1 100 180 Z");
        assert_eq!(ws[1].path(), "M 100 100 L 100 180 A 80 80 0 0 1 100 20 Z");
    }

    #[test]
    fn quarter_split_sets_large_arc_on_remainder() {
        let ws = pie_wedges(&ratio(25.0));
        assert_eq!(ws[0].sweep_degrees, 90.0);
        assert!(!ws[0].large_arc());
        assert_eq!(ws[0].path(), "M 100 100 L 100 20 A 80 80 0 0 1 180 100 Z");
        assert_eq!(ws[1].sweep_degrees, 270.0);
        assert!(ws[1].large_arc());
        assert_eq!(ws[1].path(), "M 100 100 L 180 100 A 80 80 0 1 1 100 20 Z");
    }

    #[test]
    fn zero_percent_wedge_is_omitted() {
        let ws = pie_wedges(&ratio(0.0));
        assert_eq!(ws.len(), 1);
        assert_eq!(ws[0].label, "Female");
        assert_eq!(
            ws[0].path(),
            "M 100 100 L 100 20 A 80 80 0 0 1 100 180 A 80 80 0 0 1 100 20 Z"
        );

        let ws = pie_wedges(&ratio(100.0));
        assert_eq!(ws.len(), 1);
        assert_eq!(ws[0].label, "Male");
    }

    #[test]
    fn svg_contains_one_path_per_wedge() {
        let svg = pie_chart_svg(&ratio(60.0));
        assert!(svg.starts_with("<svg class=\"pie-chart\" viewBox=\"0 0 200 200\">"));
        assert_eq!(svg.matches("<path ").count(), 2);
        assert!(svg.contains(MALE_FILL));
        assert!(svg.contains(FEMALE_FILL));
        assert_eq!(pie_chart_svg(&ratio(0.0)).matches("<path ").count(), 1);
    }

    proptest! {
        #[test]
        fn sweeps_cover_the_circle(male in 0u32..=100) {
            let ws = pie_wedges(&ratio(male as f64));
            let total: f64 = ws.iter().map(|w| w.sweep_degrees).sum();
            prop_assert_eq!(total, 360.0);
            prop_assert_eq!(ws.iter().any(|w| w.label == "Male"), male > 0);
            prop_assert_eq!(ws.iter().any(|w| w.label == "Female"), male < 100);
        }
    }
}
