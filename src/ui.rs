use egui::Context;

use crate::model::Scene;

/// Build the debug panel and return egui output
pub fn build_ui(egui_ctx: &Context, raw_input: egui::RawInput, scene: &mut Scene, dt: f32) -> egui::FullOutput {
    egui_ctx.run(raw_input, |ctx| {
        draw_debug_window(ctx, scene, dt);
    })
}

fn drag(ui: &mut egui::Ui, label: &str, value: &mut f32, step: f64) {
    ui.horizontal(|ui| {
        ui.add(egui::DragValue::new(value).speed(step).fixed_decimals(decimals(step)));
        ui.label(egui::RichText::new(label).small());
    });
}

fn unit_slider(ui: &mut egui::Ui, label: &str, value: &mut f32) {
    ui.add(
        egui::Slider::new(value, 0.0..=1.0)
            .clamping(egui::SliderClamping::Edits)
            .step_by(0.0001)
            .text(egui::RichText::new(label).small()),
    );
}

fn decimals(step: f64) -> usize {
    (-step.log10()).round().max(0.0) as usize
}

fn draw_debug_window(ctx: &Context, scene: &mut Scene, dt: f32) {
    egui::Window::new("Debug")
        .default_pos([8.0, 8.0])
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new(format!("FPS: {:.0}", if dt > 0.0 { 1.0 / dt } else { 0.0 }))
                    .small(),
            );
            ui.label(egui::RichText::new(format!("Objects: {}", scene.background.objects().len())).small());
            ui.separator();

            let mirror = &mut scene.mirror;
            drag(ui, "mirror rotation x", &mut mirror.transform.rotation.x, 0.01);
            drag(ui, "mirror rotation y", &mut mirror.transform.rotation.y, 0.1);
            drag(ui, "x", &mut mirror.transform.position.x, 0.1);
            drag(ui, "y", &mut mirror.transform.position.y, 0.1);
            drag(ui, "z", &mut mirror.transform.position.z, 0.1);

            let material = &mut mirror.material;
            unit_slider(ui, "metalness", &mut material.metalness);
            unit_slider(ui, "roughness", &mut material.roughness);
            unit_slider(ui, "thickness", &mut material.thickness);
            unit_slider(ui, "ior", &mut material.ior);
            unit_slider(ui, "transmission", &mut material.transmission);
            ui.separator();

            let eye = &mut scene.camera.eye;
            drag(ui, "camera X", &mut eye.x, 0.1);
            drag(ui, "camera y", &mut eye.y, 0.1);
            drag(ui, "camera z", &mut eye.z, 0.1);
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimals_follow_step() {
        assert_eq!(decimals(0.1), 1);
        assert_eq!(decimals(0.01), 2);
        assert_eq!(decimals(0.0001), 4);
        assert_eq!(decimals(1.0), 0);
    }

    #[test]
    fn test_panel_runs_without_touching_state() {
        let ctx = Context::default();
        let mut scene = Scene::new(800, 600);
        let before = scene.mirror.clone();
        for _ in 0..2 {
            build_ui(&ctx, egui::RawInput::default(), &mut scene, 0.016);
        }
        assert_eq!(scene.mirror, before);
    }
}
