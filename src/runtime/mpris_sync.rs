use crate::app::App;
use crate::mpris::MprisHandle;

/// Push the current now-playing identity and playback state to MPRIS.
pub fn update_mpris(mpris: &MprisHandle, app: &App) {
    let idx = app.playing_index();
    let track = idx.and_then(|i| app.controller.tracks().get(i));
    mpris.set_track_metadata(idx, track);
    mpris.set_playback(app.playback);
}
