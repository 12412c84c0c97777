//! Right-hand sidebar: the update rules, their symbols, and the values they
//! currently hold

use egui::{Color32, Context, RichText, Ui};

use crate::physics::Simulation;

/// One update rule shown in the sidebar
pub struct Equation {
    pub name: &'static str,
    pub formula: &'static str,
    pub description: &'static str,
}

/// Symbol readouts for the current ball state
pub fn live_values(simulation: &Simulation) -> Vec<(&'static str, String)> {
    let ball = &simulation.ball;
    let fmt = |v: glam::Vec3| format!("({:.1}, {:.1}, {:.1})", v.x, v.y, v.z);
    vec![
        ("p⃗", fmt(ball.position)),
        ("v⃗", fmt(ball.velocity)),
        ("g", format!("{:.2}", simulation.gravity)),
        ("h⃗", fmt(simulation.bounds.half_extents)),
        ("resets", simulation.resets.to_string()),
    ]
}

fn equation_card(ui: &mut Ui, eq: &Equation) {
    ui.group(|ui| {
        ui.label(RichText::new(eq.name).strong().color(Color32::YELLOW));
        ui.label(RichText::new(eq.formula).monospace());
        ui.label(RichText::new(eq.description).small().italics());
    });
}

fn symbol_grid<'a>(ui: &mut Ui, id: &str, rows: impl IntoIterator<Item = (&'a str, String)>) {
    egui::Grid::new(id)
        .num_columns(2)
        .spacing([10.0, 4.0])
        .show(ui, |ui| {
            for (symbol, text) in rows {
                ui.label(RichText::new(symbol).monospace().color(Color32::LIGHT_GREEN));
                ui.label(text);
                ui.end_row();
            }
        });
}

pub fn draw_equations_sidebar(ctx: &Context, simulation: &Simulation) {
    egui::SidePanel::right("equations_panel")
        .resizable(true)
        .default_width(260.0)
        .show(ctx, |ui| {
            ui.heading(RichText::new("Cannonball Motion").color(Color32::LIGHT_BLUE));
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.collapsing(RichText::new("Update rules").strong(), |ui| {
                    for eq in CANNONBALL_EQUATIONS {
                        equation_card(ui, eq);
                        ui.add_space(4.0);
                    }
                });
                ui.add_space(8.0);

                ui.collapsing(RichText::new("Symbols").strong(), |ui| {
                    let rows = CANNONBALL_VARIABLES
                        .iter()
                        .map(|(symbol, meaning)| (*symbol, meaning.to_string()));
                    symbol_grid(ui, "symbols_grid", rows);
                });
                ui.add_space(8.0);

                egui::CollapsingHeader::new(RichText::new("Live values").strong())
                    .default_open(true)
                    .show(ui, |ui| {
                        symbol_grid(ui, "live_values_grid", live_values(simulation));
                    });
            });
        });
}

pub const CANNONBALL_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Gravity",
        formula: "vᵧ ← vᵧ + Δt·g",
        description: "Vertical velocity changes by g per second",
    },
    Equation {
        name: "Displacement",
        formula: "p⃗ ← p⃗ + v⃗",
        description: "Position moves by one velocity per frame",
    },
    Equation {
        name: "Bounds Reset",
        formula: "|pᵢ| > hᵢ ⇒ p⃗ ← p⃗₀, v⃗ ← v⃗₀",
        description: "Relaunch from the cannon when the ball leaves the box",
    },
    Equation {
        name: "Diffuse Lighting",
        formula: "I = k_a + k_d·max(n̂·l̂, 0)",
        description: "Shading of the cannon and static objects",
    },
];

pub const CANNONBALL_VARIABLES: &[(&str, &str)] = &[
    ("p⃗", "Ball position"),
    ("v⃗", "Ball velocity"),
    ("g", "Gravity (-1)"),
    ("Δt", "Seconds since last frame"),
    ("p⃗₀", "Cannon position"),
    ("v⃗₀", "Cannon direction"),
    ("hᵢ", "Bounds half extent (1000, 500, 1000)"),
    ("l̂", "Light direction"),
    ("k_a, k_d", "Ambient and diffuse intensity"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::Cannon;
    use glam::Vec3;

    #[test]
    fn test_live_values_follow_the_ball() {
        let cannon = Cannon::new(Vec3::new(3.0, 1.0, -4.0), Vec3::ZERO);
        let mut sim = Simulation::new(&cannon);
        sim.step(0.5, &cannon);

        let values = live_values(&sim);
        assert_eq!(values[0], ("p⃗", "(3.0, 0.5, -4.0)".to_string()));
        assert_eq!(values[1], ("v⃗", "(3.0, 0.5, -4.0)".to_string()));
        assert_eq!(values[2].1, "-1.00");
        assert_eq!(values[4].1, "0");
    }

    #[test]
    fn test_every_rule_has_text() {
        for eq in CANNONBALL_EQUATIONS {
            assert!(!eq.name.is_empty() && !eq.formula.is_empty());
        }
    }
}
