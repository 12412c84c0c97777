//! Slider panel bound to [`Controls`]

use egui::{Color32, Context, RichText, Ui};
use glam::Vec3;

use crate::controls::{
    set_axis, Axis, Controls, SliderRange, VectorRange, CANNON_DIRECTION_RANGE,
    CANNON_POSITION_RANGE, LIGHT_DIRECTION_RANGE, OBJECT_POSITION_RANGE, OBJECT_ROTATION_RANGE,
    OBJECT_SCALE_RANGE,
};

/// Objects added per click of the scatter button
pub const SCATTER_COUNT: usize = 8;

/// Requests the panel can't satisfy by editing [`Controls`] alone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelActions {
    pub relaunch: bool,
}

fn axis_slider(ui: &mut Ui, axis: Axis, value: f32, range: SliderRange) -> Option<f32> {
    let mut edited = value;
    let response = ui.add(
        egui::Slider::new(&mut edited, range.min..=range.max)
            .step_by(range.step as f64)
            .text(axis.label()),
    );
    response.changed().then_some(edited)
}

/// Write one slider edit back into a vector, keeping every axis in range
fn apply_axis_edit(value: Vec3, axis: Axis, edited: f32, range: &VectorRange) -> Vec3 {
    range.clamp(set_axis(value, axis, edited))
}

/// Three sliders editing a vector in place
fn vector_sliders(ui: &mut Ui, value: &mut Vec3, range: &VectorRange) {
    for axis in Axis::ALL {
        if let Some(edited) = axis_slider(ui, axis, axis.get(*value), range.axis(axis)) {
            *value = apply_axis_edit(*value, axis, edited, range);
        }
    }
}

pub fn draw_controls_panel(ctx: &Context, controls: &mut Controls) -> PanelActions {
    let mut actions = PanelActions::default();

    egui::SidePanel::left("controls_panel")
        .resizable(true)
        .default_width(240.0)
        .show(ctx, |ui| {
            ui.heading(RichText::new("Controls").color(Color32::LIGHT_BLUE));
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.group(|ui| {
                    ui.label(RichText::new("Cannon Direction").strong());
                    for axis in Axis::ALL {
                        let current = axis.get(controls.cannon.direction);
                        if let Some(value) =
                            axis_slider(ui, axis, current, CANNON_DIRECTION_RANGE.axis(axis))
                        {
                            controls.set_cannon_direction(axis, value);
                        }
                    }
                });
                ui.add_space(6.0);

                ui.group(|ui| {
                    ui.label(RichText::new("Cannon Position").strong());
                    for axis in Axis::ALL {
                        let current = axis.get(controls.cannon.position);
                        if let Some(value) =
                            axis_slider(ui, axis, current, CANNON_POSITION_RANGE.axis(axis))
                        {
                            controls.set_cannon_position(axis, value);
                        }
                    }
                });
                ui.add_space(6.0);

                ui.group(|ui| {
                    ui.label(RichText::new("Light Direction").strong());
                    for axis in Axis::ALL {
                        let current = axis.get(controls.light_direction);
                        if let Some(value) =
                            axis_slider(ui, axis, current, LIGHT_DIRECTION_RANGE.axis(axis))
                        {
                            controls.set_light_direction(axis, value);
                        }
                    }
                });
                ui.add_space(6.0);

                if ui.button("Relaunch ball").clicked() {
                    actions.relaunch = true;
                }
                ui.add_space(8.0);

                ui.group(|ui| {
                    ui.label(RichText::new("Objects").strong());
                    ui.label(format!(
                        "{} / {} placed",
                        controls.objects.len(),
                        controls.max_objects
                    ));
                    ui.horizontal(|ui| {
                        let has_room = controls.objects.len() < controls.max_objects;
                        if ui
                            .add_enabled(has_room, egui::Button::new("Scatter"))
                            .clicked()
                        {
                            controls.scatter_objects(SCATTER_COUNT, &mut rand::thread_rng());
                        }
                        if ui.button("Clear").clicked() {
                            controls.clear_objects();
                        }
                    });

                    for (i, object) in controls.objects.iter_mut().enumerate() {
                        ui.collapsing(format!("Object {}", i + 1), |ui| {
                            ui.label("Position");
                            vector_sliders(ui, &mut object.position, &OBJECT_POSITION_RANGE);
                            ui.label("Rotation");
                            vector_sliders(ui, &mut object.rotation, &OBJECT_ROTATION_RANGE);
                            ui.add(
                                egui::Slider::new(
                                    &mut object.scale,
                                    OBJECT_SCALE_RANGE.min..=OBJECT_SCALE_RANGE.max,
                                )
                                .step_by(OBJECT_SCALE_RANGE.step as f64)
                                .text("Scale"),
                            );
                        });
                    }
                });
            });
        });

    actions
}
