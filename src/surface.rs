//! The control surface served when a request is not a drive command.

use trundle_command::Reply;
use trundle_motion::DirectionMode;

const TEMPLATE: &str = include_str!("../assets/control_surface.html");

/// One control-surface button.
enum Button {
    Direction(DirectionMode),
    EmergencyStop,
}

/// Button grid, row by row.
const LAYOUT: [&[Button]; 3] = [
    &[
        Button::Direction(DirectionMode::SpinLeft),
        Button::Direction(DirectionMode::Forward),
        Button::Direction(DirectionMode::SpinRight),
    ],
    &[
        Button::Direction(DirectionMode::SpinBackLeft),
        Button::Direction(DirectionMode::Reverse),
        Button::Direction(DirectionMode::SpinBackRight),
    ],
    &[
        Button::Direction(DirectionMode::Stopped),
        Button::EmergencyStop,
    ],
];

impl Button {
    fn path(&self) -> &'static str {
        match self {
            Button::Direction(mode) => mode.path_segment(),
            Button::EmergencyStop => "emergencystop",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Button::Direction(DirectionMode::Forward) => "Forward",
            Button::Direction(DirectionMode::Reverse) => "Reverse",
            Button::Direction(DirectionMode::SpinLeft) => "Spin Left",
            Button::Direction(DirectionMode::SpinRight) => "Spin Right",
            Button::Direction(DirectionMode::SpinBackLeft) => "Spin Back-Left",
            Button::Direction(DirectionMode::SpinBackRight) => "Spin Back-Right",
            Button::Direction(DirectionMode::Stopped) => "Stop",
            Button::EmergencyStop => "Emergency Stop",
        }
    }

    fn class(&self) -> &'static str {
        match self {
            Button::Direction(DirectionMode::Stopped) | Button::EmergencyStop => "halt",
            Button::Direction(mode) if !mode.is_wired() => "unwired",
            Button::Direction(_) => "drive",
        }
    }
}

/// Render the body for `reply`; the control surface addresses `node`.
pub fn render(reply: &Reply, node: &str) -> String {
    match reply.message() {
        Some(message) => message,
        None => control_surface(node),
    }
}

pub fn control_surface(node: &str) -> String {
    TEMPLATE
        .replace("{{NODE}}", &sanitize_host(node))
        .replace("{{BUTTONS}}", &button_rows())
}

fn button_rows() -> String {
    let mut rows = String::new();
    for row in LAYOUT {
        rows.push_str("      <tr>\n");
        for button in row {
            rows.push_str(&format!(
                "        <td><button class=\"{}\" data-path=\"{}\">{}</button></td>\n",
                button.class(),
                button.path(),
                button.label()
            ));
        }
        rows.push_str("      </tr>\n");
    }
    rows
}

/// Keep only characters that can appear in a host or `host:port`.
fn sanitize_host(node: &str) -> String {
    node.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | ':' | '-' | '_' | '[' | ']'))
        .collect()
}
