#![no_main]

use libfuzzer_sys::fuzz_target;
use tunes::core::Session;
use tunes::model::{Album, Track};

fuzz_target!(|data: &[u8]| {
    let mut session = Session::new();
    let albums = (0..8)
        .map(|idx| {
            let len = data.get(idx).map_or(1, |byte| (*byte % 4) as usize);
            Album::new(
                format!("album_{idx}"),
                (0..len)
                    .map(|track| Track::new(format!("/music/{idx}/{track}.mp3")))
                    .collect(),
            )
        })
        .collect();
    session.reset_library(albums);

    for byte in data {
        let arg = (byte >> 3) as usize;
        match byte % 7 {
            0 => {
                let _ = session.queue_album(arg % 8);
            }
            1 => {
                let len = session.playlist().len().max(1);
                let _ = session.remove_from_playlist(arg % len);
            }
            2 => {
                let _ = session.next_track();
            }
            3 => {
                let _ = session.prev_track();
            }
            4 => session.toggle(),
            5 => {
                let _ = session.jump_to(arg % 4, arg % 3);
            }
            _ => session.pause(),
        }

        let (album, track) = session.player().position();
        if session.playlist().is_empty() {
            assert_eq!((album, track), (0, 0));
        } else {
            let current = session.playlist().get(album).expect("album in range");
            assert!(track < current.track_count());
        }
    }
});
