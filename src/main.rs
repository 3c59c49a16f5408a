fn main() -> Result<(), eframe::Error> {
    // Set up logging for development
    env_logger::init();

    // Run the layout editor
    factory_layout_editor::run_app()
}
