use crate::arrowhead::ArrowHeadStyle;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingMode {
    /// Never search; conflicts are handled by bending a single curve.
    Simple,
    #[default]
    Pathfinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Clearance kept between a route and obstacle boundaries.
    pub margin: f32,
    pub routing_mode: RoutingMode,
    /// Bend of single-curve arrows as a fraction of their length; 0 keeps
    /// arrows straight and routed polylines angular.
    pub curvature: f32,
    /// Tangent scale used when smoothing a routed polyline.
    pub smoothness: f32,
    pub avoid_obstacles: bool,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            margin: 15.0,
            routing_mode: RoutingMode::Pathfinding,
            curvature: 0.0,
            smoothness: 0.3,
            avoid_obstacles: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrowConfig {
    pub start_head: ArrowHeadStyle,
    pub end_head: ArrowHeadStyle,
    pub head_size: f32,
    pub stroke_width: f32,
}

impl Default for ArrowConfig {
    fn default() -> Self {
        Self {
            start_head: ArrowHeadStyle::None,
            end_head: ArrowHeadStyle::Triangle,
            head_size: 12.0,
            stroke_width: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    /// Decimal places of the distance label; `None` disables the label.
    pub precision: Option<usize>,
    /// Overrides the theme font when set.
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub font_weight: u16,
    pub italic: bool,
    /// Perpendicular distance between the chord and the label centre.
    pub offset: f32,
    pub unit: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            precision: None,
            font_family: None,
            font_size: None,
            font_weight: 400,
            italic: false,
            offset: 10.0,
            unit: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    /// Space kept around the scene when the SVG viewBox is fitted.
    pub padding: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            padding: 24.0,
            background: "white".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub theme: Theme,
    pub route: RouteConfig,
    pub arrow: ArrowConfig,
    pub label: LabelConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::modern();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            route: RouteConfig::default(),
            arrow: ArrowConfig::default(),
            label: LabelConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    stroke_color: Option<String>,
    head_fill_color: Option<String>,
    label_color: Option<String>,
    background: Option<String>,
    obstacle_fill: Option<String>,
    obstacle_stroke: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RouteConfigFile {
    margin: Option<f32>,
    routing_mode: Option<RoutingMode>,
    curvature: Option<f32>,
    smoothness: Option<f32>,
    avoid_obstacles: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ArrowConfigFile {
    start_head: Option<ArrowHeadStyle>,
    end_head: Option<ArrowHeadStyle>,
    head_size: Option<f32>,
    stroke_width: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LabelConfigFile {
    precision: Option<usize>,
    font_family: Option<String>,
    font_size: Option<f32>,
    font_weight: Option<u16>,
    italic: Option<bool>,
    offset: Option<f32>,
    unit: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    padding: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    route: Option<RouteConfigFile>,
    arrow: Option<ArrowConfigFile>,
    label: Option<LabelConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let contents = std::fs::read_to_string(path)?;
    let is_json5 = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json5"))
        .unwrap_or(false);
    let parsed: ConfigFile = if is_json5 {
        json5::from_str(&contents)?
    } else {
        serde_json::from_str(&contents)?
    };
    Ok(merge_config(Config::default(), parsed))
}

/// Parses JSON config text and merges it over the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;
    Ok(merge_config(Config::default(), parsed))
}

fn merge_config(mut config: Config, parsed: ConfigFile) -> Config {
    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "modern" {
            config.theme = Theme::modern();
        } else if theme_name == "classic" || theme_name == "default" {
            config.theme = Theme::classic();
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.stroke_color {
            config.theme.stroke_color = v;
        }
        if let Some(v) = vars.head_fill_color {
            config.theme.head_fill_color = v;
        }
        if let Some(v) = vars.label_color {
            config.theme.label_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.obstacle_fill {
            config.theme.obstacle_fill = v;
        }
        if let Some(v) = vars.obstacle_stroke {
            config.theme.obstacle_stroke = v;
        }
    }

    if let Some(route) = parsed.route {
        if let Some(v) = route.margin {
            config.route.margin = v.max(0.0);
        }
        if let Some(v) = route.routing_mode {
            config.route.routing_mode = v;
        }
        if let Some(v) = route.curvature {
            config.route.curvature = v;
        }
        if let Some(v) = route.smoothness {
            config.route.smoothness = v.clamp(0.0, 1.0);
        }
        if let Some(v) = route.avoid_obstacles {
            config.route.avoid_obstacles = v;
        }
    }

    if let Some(arrow) = parsed.arrow {
        if let Some(v) = arrow.start_head {
            config.arrow.start_head = v;
        }
        if let Some(v) = arrow.end_head {
            config.arrow.end_head = v;
        }
        if let Some(v) = arrow.head_size {
            config.arrow.head_size = v.max(0.0);
        }
        if let Some(v) = arrow.stroke_width {
            config.arrow.stroke_width = v.max(0.0);
        }
    }

    if let Some(label) = parsed.label {
        if label.precision.is_some() {
            config.label.precision = label.precision;
        }
        if label.font_family.is_some() {
            config.label.font_family = label.font_family;
        }
        if label.font_size.is_some() {
            config.label.font_size = label.font_size;
        }
        if let Some(v) = label.font_weight {
            config.label.font_weight = v;
        }
        if let Some(v) = label.italic {
            config.label.italic = v;
        }
        if let Some(v) = label.offset {
            config.label.offset = v;
        }
        if let Some(v) = label.unit {
            config.label.unit = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.padding {
            config.render.padding = v.max(0.0);
        }
    }

    config.render.background = config.theme.background.clone();
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.route.margin, 15.0);
        assert_eq!(config.route.routing_mode, RoutingMode::Pathfinding);
        assert!(config.route.avoid_obstacles);
        assert_eq!(config.arrow.end_head, ArrowHeadStyle::Triangle);
        assert!(config.label.precision.is_none());
    }

    #[test]
    fn camel_case_fields_override_defaults() {
        let config = parse_config(
            r##"{
                "theme": "classic",
                "themeVariables": { "strokeColor": "#ff0000" },
                "route": { "margin": 8, "routingMode": "simple", "curvature": 0.4 },
                "arrow": { "startHead": "circleOpen", "endHead": "diamond", "headSize": 16 },
                "label": { "precision": 1, "unit": "px" }
            }"##,
        )
        .expect("config should parse");
        assert_eq!(config.theme.stroke_color, "#ff0000");
        assert_eq!(config.theme.font_size, Theme::classic().font_size);
        assert_eq!(config.route.margin, 8.0);
        assert_eq!(config.route.routing_mode, RoutingMode::Simple);
        assert_eq!(config.route.curvature, 0.4);
        assert_eq!(config.arrow.start_head, ArrowHeadStyle::CircleOpen);
        assert_eq!(config.arrow.end_head, ArrowHeadStyle::Diamond);
        assert_eq!(config.arrow.head_size, 16.0);
        assert_eq!(config.label.precision, Some(1));
        assert_eq!(config.label.unit, "px");
    }

    #[test]
    fn negative_margin_is_clamped() {
        let config = parse_config(r#"{ "route": { "margin": -4 } }"#).expect("config should parse");
        assert_eq!(config.route.margin, 0.0);
    }

    #[test]
    fn unknown_head_style_is_rejected() {
        assert!(parse_config(r#"{ "arrow": { "endHead": "harpoon" } }"#).is_err());
    }

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).expect("defaults should load");
        assert_eq!(config.render.background, config.theme.background);
    }
}
