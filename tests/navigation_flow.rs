use tunes::core::Session;
use tunes::error::PlayerError;
use tunes::model::{Album, Track};

fn album(name: &str, tracks: usize) -> Album {
    Album::new(
        name,
        (0..tracks)
            .map(|n| Track::new(format!("/music/{name}/{n}.mp3")))
            .collect(),
    )
}

#[test]
fn two_album_playlist_walks_and_wraps() {
    let mut session = Session::new();
    session.reset_library(vec![album("a", 2), album("b", 1)]);
    session.queue_album(0).expect("queue a");
    session.queue_album(1).expect("queue b");
    assert_eq!(session.player().position(), (0, 0));

    session.next_track().expect("next");
    assert_eq!(session.player().position(), (0, 1));
    session.next_track().expect("next");
    assert_eq!(session.player().position(), (1, 0));
    session.next_track().expect("next");
    assert_eq!(session.player().position(), (0, 0));

    session.prev_track().expect("prev");
    assert_eq!(session.player().position(), (1, 0));
    assert_eq!(session.current_track_url(), Ok("/music/b/0.mp3"));
}

#[test]
fn playlist_lifecycle_from_empty_and_back() {
    let mut session = Session::new();
    session.reset_library(vec![album("solo", 3)]);

    assert_eq!(session.next_track(), Err(PlayerError::EmptyPlaylist));

    session.queue_album(0).expect("queue");
    assert_eq!(
        session.current_album().map(|album| album.title.as_deref()),
        Ok(Some("solo"))
    );
    session.play();
    session.next_track().expect("next");
    session.next_track().expect("next");
    assert_eq!(session.current_track_url(), Ok("/music/solo/2.mp3"));

    session.remove_from_playlist(0).expect("remove");
    assert!(session.player().is_stopped());
    assert_eq!(session.player().position(), (0, 0));
    assert_eq!(session.current_track_url(), Err(PlayerError::EmptyPlaylist));
}
