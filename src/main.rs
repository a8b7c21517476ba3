/// Playmap Overlay entry point: pick an image and a keymap, then save the keymap.
fn main() {
    use playmap_overlay::{EditorConfig, NativeDialogs, RasterDecoder, Session};

    let config = EditorConfig::default();
    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .init();

    let dialogs = NativeDialogs;
    let decoder = RasterDecoder::new(config.display_margin);
    let session = Session::new(&dialogs, &dialogs, &decoder, &config);

    let mut editor = match session.start() {
        Ok(Some(editor)) => editor,
        Ok(None) => return,
        Err(e) => {
            eprintln!("Application error: {}", e);
            std::process::exit(1);
        }
    };

    log::info!("{}", editor.window_title());
    log::info!("{}", editor.app.document.summary());

    if let Err(e) = session.save_as(&mut editor) {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}
