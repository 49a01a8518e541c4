use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub stroke_color: String,
    /// Interior of open heads (triangleOpen, diamondOpen, circleOpen).
    pub head_fill_color: String,
    pub label_color: String,
    pub background: String,
    pub obstacle_fill: String,
    pub obstacle_stroke: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 14.0,
            stroke_color: "#333333".to_string(),
            head_fill_color: "#FFFFFF".to_string(),
            label_color: "#333333".to_string(),
            background: "#FFFFFF".to_string(),
            obstacle_fill: "#ECECFF".to_string(),
            obstacle_stroke: "#9370DB".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 12.0,
            stroke_color: "#1C2430".to_string(),
            head_fill_color: "#FFFFFF".to_string(),
            label_color: "#1C2430".to_string(),
            background: "#FFFFFF".to_string(),
            obstacle_fill: "#F8FAFF".to_string(),
            obstacle_stroke: "#C7D2E5".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::modern()
    }
}
