use crate::app::App;
use crate::config::Settings;
use crate::library;
use crate::playlist::{PlaylistController, store};

/// Populate the controller from the music directory and the saved playlist,
/// then wrap it in the presentation model.
///
/// The scan runs first and the restore second, the order earlier releases
/// used; dedup makes the overlap harmless.
pub fn build_app(settings: &Settings) -> App {
    let mut controller = PlaylistController::new();

    for track in library::scan(&settings.library.music_dir, &settings.library) {
        controller.add(track);
    }

    let mut restore_note = None;
    if settings.playlist.restore_on_start {
        match store::load(&settings.playlist.path) {
            Ok(paths) => {
                controller.load_persisted(&paths);
            }
            Err(e) => {
                restore_note = Some(format!(
                    "could not read {}: {e}",
                    settings.playlist.path.display()
                ));
            }
        }
    }

    let mut app = App::new(controller);
    app.volume = settings.audio.initial_volume;
    app.follow_playback = settings.ui.follow_playback;
    app.set_music_dir(settings.library.music_dir.display().to_string());
    if let Some(note) = restore_note {
        app.set_status(note);
    }
    app
}
