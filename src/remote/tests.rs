use super::*;

use std::path::PathBuf;
use std::sync::mpsc;

use crate::library::Track;

fn make_event() -> NowPlayingEvent {
    let track = Track {
        path: PathBuf::from("/tmp/music/test.mp3"),
        title: Some("Test Title".to_string()),
        artist: Some("Test Artist".to_string()),
        album: Some("Test Album".to_string()),
        genre: None,
        duration: None,
        cover: None,
    };
    NowPlayingEvent::from_track(&track, "art_ref".to_string(), "small_ref".to_string())
}

#[test]
fn deliver_sets_and_clear_removes_the_shared_event() {
    let handle = RemoteHandle {
        state: Arc::new(Mutex::new(SharedStatus::default())),
    };

    handle.deliver(&make_event()).unwrap();
    {
        let s = handle.state.lock().unwrap();
        let event = s.now_playing.as_ref().unwrap();
        assert_eq!(event.state, "by Test Artist");
        assert_eq!(event.details, "Listening to Test Title");
    }

    handle.clear_now_playing();
    assert!(handle.state.lock().unwrap().now_playing.is_none());
}

#[test]
fn playback_status_maps_state_to_strings() {
    let state = Arc::new(Mutex::new(SharedStatus::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    {
        let mut s = state.lock().unwrap();
        s.playback = PlaybackStatus::Stopped;
    }
    assert_eq!(iface.playback_status(), "Stopped");

    {
        let mut s = state.lock().unwrap();
        s.playback = PlaybackStatus::Playing;
    }
    assert_eq!(iface.playback_status(), "Playing");

    {
        let mut s = state.lock().unwrap();
        s.playback = PlaybackStatus::Paused;
    }
    assert_eq!(iface.playback_status(), "Paused");
}

#[test]
fn now_playing_includes_expected_keys_when_present() {
    let state = Arc::new(Mutex::new(SharedStatus::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    assert!(iface.now_playing().is_empty());

    {
        let mut s = state.lock().unwrap();
        s.now_playing = Some(make_event());
    }

    let map = iface.now_playing();
    for k in [
        "state",
        "details",
        "large_image",
        "large_text",
        "small_image",
        "small_text",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn position_reports_minus_one_when_idle() {
    let state = Arc::new(Mutex::new(SharedStatus::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    assert_eq!(iface.position(), -1);

    {
        let mut s = state.lock().unwrap();
        s.position_secs = Some(42);
    }
    assert_eq!(iface.position(), 42);
}

#[test]
fn player_methods_forward_commands() {
    let state = Arc::new(Mutex::new(SharedStatus::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };

    iface.play_track(3);
    iface.set_volume(70);
    iface.seek(15);
    iface.open_directory("/tmp/music".to_string());

    assert!(matches!(rx.try_recv(), Ok(ControlCmd::PlayIndex(3))));
    assert!(matches!(rx.try_recv(), Ok(ControlCmd::SetVolume(70))));
    assert!(matches!(rx.try_recv(), Ok(ControlCmd::Seek(15))));
    assert!(matches!(rx.try_recv(), Ok(ControlCmd::OpenDirectory(p)) if p == "/tmp/music"));
}
