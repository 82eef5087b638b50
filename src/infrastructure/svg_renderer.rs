// SVG renderer backend
use crate::application::renderer::Renderer;
use crate::domain::chart::ChartFrame;
use crate::infrastructure::scene_renderer::{Scene, SceneRenderer};
use std::fmt::Write;

const LINE_COLOR: &str = "steelblue";
const BAND_COLOR: &str = "rgb(229,222,247)";
const NOW_COLOR: &str = "red";

#[derive(Debug, Default, Clone, Copy)]
pub struct SvgRenderer;

impl Renderer for SvgRenderer {
    type Output = String;

    fn draw(&self, frame: &ChartFrame) -> String {
        render_scene(&SceneRenderer.draw(frame))
    }
}

fn path_data(points: &[(f64, f64)]) -> String {
    let mut d = String::new();
    for (i, (x, y)) in points.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        let _ = write!(d, "{}{},{}", cmd, x, y);
    }
    d
}

fn render_scene(scene: &Scene) -> String {
    let mut svg = String::new();
    let (w, h) = (scene.inner_width, scene.inner_height);

    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
        scene.width, scene.height
    );
    let _ = write!(
        svg,
        r#"<defs><clipPath id="clip"><rect width="{w}" height="{h}"/></clipPath><linearGradient id="line-gradient" gradientUnits="userSpaceOnUse" x1="0" y1="{}" x2="0" y2="{}"><stop offset="0%" stop-color="{LINE_COLOR}" stop-opacity="1"/><stop offset="100%" stop-color="{LINE_COLOR}" stop-opacity="0"/></linearGradient></defs>"#,
        scene.gradient.0, scene.gradient.1
    );
    let _ = write!(
        svg,
        r#"<g transform="translate({},{})">"#,
        scene.origin.0, scene.origin.1
    );

    svg.push_str(r#"<g class="y-axis">"#);
    for tick in &scene.y_ticks {
        let _ = write!(
            svg,
            r#"<line class="horizontal-line" x1="0" x2="{w}" y1="{p}" y2="{p}" stroke="lightgray"/><text x="-9" y="{p}" text-anchor="end" dy="0.32em">{}</text>"#,
            tick.label,
            p = tick.position
        );
    }
    svg.push_str("</g>");

    let _ = write!(svg, r#"<g class="x-axis" transform="translate(0,{h})">"#);
    for tick in &scene.x_ticks {
        let _ = write!(
            svg,
            r#"<line x1="{p}" x2="{p}" y1="0" y2="6" stroke="currentColor"/><text x="{p}" y="9" dy="0.71em" text-anchor="middle">{}</text>"#,
            tick.label,
            p = tick.position
        );
    }
    svg.push_str("</g>");

    if let (Some(first), Some(last)) = (scene.line.first(), scene.line.last()) {
        let mut area = scene.line.clone();
        area.push((last.0, h));
        area.push((first.0, h));
        let _ = write!(
            svg,
            r#"<path class="area" d="{}Z" fill="url(#line-gradient)" stroke="none"/>"#,
            path_data(&area)
        );
        let _ = write!(
            svg,
            r#"<path class="line" d="{}" fill="none" stroke="{LINE_COLOR}" stroke-width="1.5" stroke-linejoin="round" stroke-linecap="round"/>"#,
            path_data(&scene.line)
        );
    }

    for band in &scene.bands {
        let _ = write!(
            svg,
            r#"<rect class="fishing-window" x="{}" y="0" width="{}" height="{h}" fill="{BAND_COLOR}" opacity="0.3" clip-path="url(#clip)"/>"#,
            band.x, band.width
        );
    }

    if let Some(x) = scene.now_x {
        let _ = write!(
            svg,
            r#"<line class="current-time" x1="{x}" x2="{x}" y1="0" y2="{h}" stroke="{NOW_COLOR}" stroke-width="2"/>"#
        );
    }

    svg.push_str("</g></svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::tide_service::test_support::*;
    use crate::domain::scale::ContainerSize;
    use std::sync::Arc;

    #[test]
    fn test_path_data() {
        assert_eq!(path_data(&[(0.0, 10.0), (5.5, 2.0)]), "M0,10L5.5,2");
        assert_eq!(path_data(&[]), "");
    }

    #[tokio::test]
    async fn test_svg_document() {
        let frame = service(Arc::new(FakeProvider::standard()))
            .build_frame(&query("9410170"), ContainerSize::new(270.0, 250.0), at(10, 0))
            .await
            .unwrap();
        let svg = SvgRenderer.draw(&frame);

        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="270" height="250">"#));
        assert!(svg.ends_with("</g></svg>"));
        assert!(svg.contains(r#"<path class="line" d="M0,136L100,17L200,183""#));
        assert!(svg.contains(r#"d="M0,136L100,17L200,183L200,200L0,200Z""#));
        assert_eq!(svg.matches(r#"class="fishing-window""#).count(), 1);
        assert!(svg.contains(r#"class="current-time" x1="100""#));
    }
}
