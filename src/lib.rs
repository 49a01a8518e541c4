pub mod arrow;
pub mod arrowhead;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod geometry;
pub mod label;
pub mod path;
pub mod render;
pub mod routing;
pub mod scene;
pub mod text_shaper;
pub mod theme;

pub use arrow::{ArrowComponent, ComponentKind, assemble_arrow, render_arrow};
pub use arrowhead::{ArrowHeadStyle, generate_arrow_head, is_filled_head};
#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, RouteConfig, RoutingMode, load_config, parse_config};
pub use geometry::{Bounds, Point};
pub use label::{LabelOutcome, ShapeError, TextRequest, TextShaper};
pub use path::{Command, PathData, commands_to_svg_path};
pub use routing::find_route;
pub use scene::{Scene, SceneError, parse_scene};
