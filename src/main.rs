fn main() {
    material_panel::app::run();
}
