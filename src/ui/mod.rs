//! egui material panel
//!
//! Pure consumer of the published [`SchemaSnapshot`]: it draws one control per
//! descriptor and reports what the user did as [`PanelIntent`]s. It never
//! touches the live material.

use egui::Ui;

use crate::binding::{EditInput, SchemaSnapshot};
use crate::material::Color3;
use crate::render::{color_from_hex, color_to_hex};
use crate::schema::{PropertyDescriptor, PropertyKind};

/// A user action on the panel, addressed by snapshot index.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelIntent {
    Edit {
        index: usize,
        value: EditInput,
    },
    EnableDefaultTexture {
        index: usize,
    },
    /// `source: None` re-uses the path currently shown.
    SetTextureEnabled {
        index: usize,
        enabled: bool,
        source: Option<String>,
    },
}

/// Everything one panel frame produced.
#[derive(Debug, Clone, Default)]
pub struct PanelOutput {
    pub intents: Vec<PanelIntent>,
    /// Screen rect of each drawn control, by snapshot index. Collapsed
    /// groups contribute nothing.
    pub controls: Vec<(usize, egui::Rect)>,
}

impl PanelOutput {
    pub fn control_rect(&self, index: usize) -> Option<egui::Rect> {
        self.controls
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, rect)| *rect)
    }
}

/// One visual row of the panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelRow<'a> {
    Property(usize),
    /// Descriptors sharing a parent, in schema order.
    Group {
        parent: &'a str,
        members: Vec<usize>,
    },
}

/// Group parented descriptors under their parent, placed where the first
/// member appears.
pub fn layout(descriptors: &[PropertyDescriptor]) -> Vec<PanelRow<'_>> {
    let mut rows: Vec<PanelRow<'_>> = Vec::new();
    for (index, descriptor) in descriptors.iter().enumerate() {
        let Some(parent) = descriptor.parent() else {
            rows.push(PanelRow::Property(index));
            continue;
        };
        let existing = rows.iter_mut().find_map(|row| match row {
            PanelRow::Group { parent: p, members } if *p == parent => Some(members),
            _ => None,
        });
        match existing {
            Some(members) => members.push(index),
            None => rows.push(PanelRow::Group {
                parent,
                members: vec![index],
            }),
        }
    }
    rows
}

#[derive(Debug, Clone)]
pub struct MaterialPanel {
    title: String,
}

impl Default for MaterialPanel {
    fn default() -> Self {
        Self::new("Material")
    }
}

impl MaterialPanel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    pub fn show(&self, ui: &mut Ui, snapshot: Option<&SchemaSnapshot>) -> PanelOutput {
        ui.heading(&self.title);
        ui.separator();

        let Some(snapshot) = snapshot else {
            ui.add_space(10.0);
            ui.vertical_centered(|ui| {
                ui.weak("Click an object to edit its material");
            });
            return PanelOutput::default();
        };

        ui.weak(format!("Object {}", snapshot.target()));
        ui.add_space(4.0);

        let descriptors = snapshot.descriptors();
        let mut output = PanelOutput::default();
        for row in layout(descriptors) {
            match row {
                PanelRow::Property(index) => {
                    property_row(ui, index, &descriptors[index], &mut output);
                }
                PanelRow::Group { parent, members } => {
                    egui::CollapsingHeader::new(parent)
                        .id_salt(("material_group", parent))
                        .default_open(true)
                        .show(ui, |ui| {
                            for index in members {
                                property_row(ui, index, &descriptors[index], &mut output);
                            }
                        });
                }
            }
        }
        output
    }
}

fn property_row(
    ui: &mut Ui,
    index: usize,
    descriptor: &PropertyDescriptor,
    output: &mut PanelOutput,
) {
    let intents = &mut output.intents;
    let control = ui
        .push_id(index, |ui| {
            ui.horizontal(|ui| {
                ui.label(descriptor.display_name());
                match descriptor.kind {
                    PropertyKind::Color => color_control(ui, index, descriptor, intents),
                    PropertyKind::TextureRef => texture_control(ui, index, descriptor, intents),
                    PropertyKind::Number => number_control(ui, index, descriptor, intents),
                    PropertyKind::Boolean => boolean_control(ui, index, descriptor, intents),
                }
            })
            .inner
        })
        .inner;
    output.controls.push((index, control.rect));
}

fn color_control(
    ui: &mut Ui,
    index: usize,
    descriptor: &PropertyDescriptor,
    intents: &mut Vec<PanelIntent>,
) -> egui::Response {
    let mut rgb = descriptor
        .display_value
        .as_text()
        .and_then(hex_to_srgb)
        .unwrap_or([0, 0, 0]);
    let response = ui.color_edit_button_srgb(&mut rgb);
    if response.changed() {
        intents.push(PanelIntent::Edit {
            index,
            value: EditInput::Text(srgb_to_hex(rgb)),
        });
    }
    if let Some(hex) = descriptor.display_value.as_text() {
        ui.monospace(hex);
    }
    response
}

fn texture_control(
    ui: &mut Ui,
    index: usize,
    descriptor: &PropertyDescriptor,
    intents: &mut Vec<PanelIntent>,
) -> egui::Response {
    let Some(source) = descriptor.display_value.as_text() else {
        let response = ui.button("Add texture");
        if response.clicked() {
            intents.push(PanelIntent::EnableDefaultTexture { index });
        }
        return response;
    };

    let mut enabled = descriptor.texture_enabled;
    let response = ui.checkbox(&mut enabled, "");
    if response.changed() {
        intents.push(PanelIntent::SetTextureEnabled {
            index,
            enabled,
            source: None,
        });
    }
    if enabled {
        ui.monospace(source);
    } else {
        ui.weak(source);
    }
    response
}

fn number_control(
    ui: &mut Ui,
    index: usize,
    descriptor: &PropertyDescriptor,
    intents: &mut Vec<PanelIntent>,
) -> egui::Response {
    let mut value = descriptor.display_value.as_number().unwrap_or(0.0);
    let mut response = ui.add(egui::DragValue::new(&mut value).speed(0.01));
    if descriptor.display_value.is_empty() {
        response = response.on_hover_text("Not set on this material");
    }
    if response.changed() {
        intents.push(PanelIntent::Edit {
            index,
            value: EditInput::Number(value),
        });
    }
    response
}

fn boolean_control(
    ui: &mut Ui,
    index: usize,
    descriptor: &PropertyDescriptor,
    intents: &mut Vec<PanelIntent>,
) -> egui::Response {
    let mut checked = descriptor.display_value.as_bool().unwrap_or(false);
    let response = ui.checkbox(&mut checked, "");
    if response.changed() {
        intents.push(PanelIntent::Edit {
            index,
            value: EditInput::Bool(checked),
        });
    }
    response
}

fn hex_to_srgb(hex: &str) -> Option<[u8; 3]> {
    let scaled = glam::Vec3::from(color_from_hex(hex)?) * 255.0;
    Some(scaled.round().to_array().map(|c| c as u8))
}

fn srgb_to_hex(rgb: [u8; 3]) -> String {
    let channels = glam::Vec3::from(rgb.map(f32::from)) / 255.0;
    color_to_hex(Color3::from(channels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{EditOutcome, SelectionSync, TextureLifecycle, TextureOutcome};
    use crate::render::MemoryRenderer;
    use crate::scene::SceneState;
    use crate::schema::PropertySchema;
    use std::sync::Arc;

    fn run_panel(snapshot: Option<&SchemaSnapshot>) -> Vec<PanelIntent> {
        let ctx = egui::Context::default();
        panel_frame(&ctx, snapshot, Vec::new()).intents
    }

    fn panel_frame(
        ctx: &egui::Context,
        snapshot: Option<&SchemaSnapshot>,
        events: Vec<egui::Event>,
    ) -> PanelOutput {
        let panel = MaterialPanel::default();
        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(1280.0, 720.0),
            )),
            events,
            ..Default::default()
        };
        let mut output = PanelOutput::default();
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                output = panel.show(ui, snapshot);
            });
        });
        output
    }

    /// Lay the panel out once, then hover, press and release the primary
    /// button over the control at `index`.
    fn click_control(snapshot: &SchemaSnapshot, index: usize) -> Vec<PanelIntent> {
        let ctx = egui::Context::default();
        let first = panel_frame(&ctx, Some(snapshot), Vec::new());
        assert!(first.intents.is_empty());
        let pos = first.control_rect(index).unwrap().center();

        let button = |pressed| egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::default(),
        };
        let mut intents = Vec::new();
        for events in [
            vec![egui::Event::PointerMoved(pos)],
            vec![button(true)],
            vec![button(false)],
            Vec::new(),
        ] {
            intents.extend(panel_frame(&ctx, Some(snapshot), events).intents);
        }
        intents
    }

    struct Selected {
        scene: SceneState,
        renderer: MemoryRenderer,
        sync: SelectionSync,
    }

    fn select_sphere() -> Selected {
        let mut renderer = MemoryRenderer::new();
        let scene = SceneState::demo(&mut renderer);
        let mut sync = SelectionSync::new(
            Arc::new(PropertySchema::default_material()),
            TextureLifecycle::default(),
        );
        let sphere = scene.find_by_name("sphere1").map(|o| o.id);
        sync.on_select(&scene, &renderer, sphere);
        Selected {
            scene,
            renderer,
            sync,
        }
    }

    #[test]
    fn parented_properties_are_grouped_in_order() {
        let schema = PropertySchema::default_material();
        let rows = layout(schema.descriptors());
        assert_eq!(
            rows,
            vec![
                PanelRow::Property(0),
                PanelRow::Property(1),
                PanelRow::Group {
                    parent: "albedoTexture",
                    members: vec![2, 3],
                },
                PanelRow::Property(4),
                PanelRow::Group {
                    parent: "bumpTexture",
                    members: vec![5, 6],
                },
                PanelRow::Group {
                    parent: "clearCoat",
                    members: vec![7, 8, 9, 10],
                },
                PanelRow::Property(11),
            ]
        );
    }

    #[test]
    fn interleaved_parents_still_collect_members() {
        let descriptors = vec![
            PropertyDescriptor::number("a").under("p"),
            PropertyDescriptor::number("b"),
            PropertyDescriptor::number("c").under("p"),
        ];
        assert_eq!(
            layout(&descriptors),
            vec![
                PanelRow::Group {
                    parent: "p",
                    members: vec![0, 2],
                },
                PanelRow::Property(1),
            ]
        );
    }

    #[test]
    fn hex_and_srgb_agree() {
        assert_eq!(hex_to_srgb("#FFC356"), Some([255, 195, 86]));
        assert_eq!(srgb_to_hex([255, 195, 86]), "#FFC356");
        assert_eq!(hex_to_srgb("nope"), None);
    }

    #[test]
    fn idle_frames_emit_no_intents() {
        assert!(run_panel(None).is_empty());
        let selected = select_sphere();
        assert!(run_panel(selected.sync.snapshot()).is_empty());
    }

    #[test]
    fn every_visible_property_reports_its_control() {
        let selected = select_sphere();
        let ctx = egui::Context::default();
        let output = panel_frame(&ctx, selected.sync.snapshot(), Vec::new());
        let mut indices: Vec<_> = output.controls.iter().map(|(i, _)| *i).collect();
        indices.sort_unstable();
        assert_eq!(indices, (0..12).collect::<Vec<_>>());
        assert!(output.control_rect(12).is_none());
        assert!(panel_frame(&ctx, None, Vec::new()).controls.is_empty());
    }

    #[test]
    fn add_texture_button_requests_the_placeholder() {
        let selected = select_sphere();
        let snapshot = selected.sync.snapshot().unwrap();
        let index = snapshot.index_of("albedoTexture", None).unwrap();
        assert!(snapshot.descriptors()[index].display_value.is_empty());

        assert_eq!(
            click_control(snapshot, index),
            vec![PanelIntent::EnableDefaultTexture { index }]
        );
    }

    #[test]
    fn unlit_checkbox_emits_a_boolean_edit() {
        let selected = select_sphere();
        let snapshot = selected.sync.snapshot().unwrap();
        let index = snapshot.index_of("unlit", None).unwrap();

        assert_eq!(
            click_control(snapshot, index),
            vec![PanelIntent::Edit {
                index,
                value: EditInput::Bool(true),
            }]
        );
    }

    #[test]
    fn bound_texture_checkbox_toggles_without_a_new_source() {
        let mut selected = select_sphere();
        let index = selected
            .sync
            .descriptor_index("albedoTexture", None)
            .unwrap();
        let outcome = selected.sync.enable_default_texture(
            &mut selected.scene,
            &mut selected.renderer,
            index,
        );
        assert!(matches!(
            outcome,
            EditOutcome::Texture(TextureOutcome::Bound(_))
        ));
        let snapshot = selected.sync.snapshot().unwrap();
        assert!(snapshot.descriptors()[index].texture_enabled);

        assert_eq!(
            click_control(snapshot, index),
            vec![PanelIntent::SetTextureEnabled {
                index,
                enabled: false,
                source: None,
            }]
        );
    }
}
