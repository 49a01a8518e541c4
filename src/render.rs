use crate::arrow::{ArrowComponent, ComponentKind};
use crate::config::RenderConfig;
use crate::geometry::Bounds;
use crate::path::{Command, commands_bounds, fmt_num};
use crate::scene::Scene;
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

/// Writes a standalone SVG document holding the obstacles and every arrow
/// component. The viewBox is fitted around them and scaled into the
/// configured output size.
pub fn render_svg(scene: &Scene, components: &[ArrowComponent], theme: &Theme, config: &RenderConfig) -> String {
    let view = content_bounds(scene, components).expand(config.padding.max(0.0));
    let width = view.width().max(1.0);
    let height = view.height().max(1.0);
    let out_width = if config.width.is_finite() && config.width > 0.0 {
        config.width
    } else {
        width
    };
    let out_height = if config.height.is_finite() && config.height > 0.0 {
        config.height
    } else {
        height
    };

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"{} {} {} {}\">",
        fmt_num(out_width),
        fmt_num(out_height),
        fmt_num(view.min_x),
        fmt_num(view.min_y),
        fmt_num(width),
        fmt_num(height),
    ));
    svg.push_str(&format!(
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
        fmt_num(view.min_x),
        fmt_num(view.min_y),
        fmt_num(width),
        fmt_num(height),
        escape_xml(&config.background)
    ));

    for obstacle in &scene.obstacles {
        svg.push_str(&format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"4\" ry=\"4\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
            fmt_num(obstacle.min_x),
            fmt_num(obstacle.min_y),
            fmt_num(obstacle.width()),
            fmt_num(obstacle.height()),
            escape_xml(&theme.obstacle_fill),
            escape_xml(&theme.obstacle_stroke)
        ));
    }

    for component in components {
        svg.push_str(&component_svg(component));
    }

    svg.push_str("</svg>");
    svg
}

fn component_svg(component: &ArrowComponent) -> String {
    let path = &component.path_data;
    let class = match component.kind {
        ComponentKind::Head => "arrow-head",
        ComponentKind::Line => "arrow-line",
        ComponentKind::Label => "arrow-label",
    };
    let fill = path.fill.as_deref().unwrap_or("none");
    let stroke = match path.stroke.as_deref() {
        Some(stroke) => format!(
            " stroke=\"{}\" stroke-width=\"{}\" stroke-linejoin=\"round\" stroke-linecap=\"round\"",
            escape_xml(stroke),
            fmt_num(path.stroke_width)
        ),
        None => String::new(),
    };
    format!(
        "<path class=\"{class}\" d=\"{}\" fill=\"{}\" fill-rule=\"{}\"{stroke}/>",
        path.to_svg_path(),
        escape_xml(fill),
        path.fill_rule.as_svg()
    )
}

fn content_bounds(scene: &Scene, components: &[ArrowComponent]) -> Bounds {
    let mut bounds = scene.bounds();
    for component in components {
        let commands: Vec<Command> = component.path_data.commands().copied().collect();
        if let Some(b) = commands_bounds(&commands) {
            let pad = component.path_data.stroke_width.max(0.0) / 2.0;
            bounds.min_x = bounds.min_x.min(b.min_x - pad);
            bounds.min_y = bounds.min_y.min(b.min_y - pad);
            bounds.max_x = bounds.max_x.max(b.max_x + pad);
            bounds.max_y = bounds.max_y.max(b.max_y + pad);
        }
    }
    bounds
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .or_else(|| usvg::Size::from_wh(800.0, 600.0))
        .ok_or_else(|| anyhow::anyhow!("Invalid output size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
