use std::sync::Once;

use arrow_router::{ArrowComponent, ComponentKind, Config, parse_config, parse_scene, render_arrow};
use log::Level;
use serde::Serialize;
use wasm_bindgen::prelude::*;

static INIT_LOGGING: Once = Once::new();

/// One component as handed to the editor's canvas layer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComponentJson {
    kind: ComponentKind,
    d: String,
    fill: Option<String>,
    stroke: Option<String>,
    stroke_width: f32,
    fill_rule: &'static str,
}

impl From<&ArrowComponent> for ComponentJson {
    fn from(component: &ArrowComponent) -> Self {
        let path = &component.path_data;
        Self {
            kind: component.kind,
            d: path.to_svg_path(),
            fill: path.fill.clone(),
            stroke: path.stroke.clone(),
            stroke_width: path.stroke_width,
            fill_rule: path.fill_rule.as_svg(),
        }
    }
}

fn build_config(options_json: Option<&str>) -> Result<Config, String> {
    let mut config = match options_json {
        Some(raw) if !raw.trim().is_empty() => parse_config(raw).map_err(|error| error.to_string())?,
        _ => Config::default(),
    };
    // No fonts are reachable from the browser sandbox.
    config.label.precision = None;
    Ok(config)
}

fn route_components(scene_json: &str, options_json: Option<&str>) -> Result<String, String> {
    let config = build_config(options_json)?;
    let scene = parse_scene(scene_json).map_err(|error| error.to_string())?;
    let components = render_arrow(scene.start, scene.end, &scene.obstacles, &config, None);
    let out: Vec<ComponentJson> = components.iter().map(ComponentJson::from).collect();
    serde_json::to_string(&out).map_err(|error| error.to_string())
}

#[wasm_bindgen]
pub fn route_arrow(scene_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    INIT_LOGGING.call_once(|| {
        let _ = console_log::init_with_level(Level::Warn);
    });
    route_components(scene_json, options_json.as_deref()).map_err(|error| JsValue::from_str(&error))
}
