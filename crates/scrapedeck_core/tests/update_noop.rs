use scrapedeck_core::gallery::{self, GalleryMsg, GalleryState};
use scrapedeck_core::search::{self, SearchMsg, SearchState};

#[test]
fn search_update_is_noop() {
    let state = SearchState::default();
    let (next, effects) = search::update(state.clone(), SearchMsg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn gallery_update_is_noop() {
    let state = GalleryState::new();
    let (next, effects) = gallery::update(state.clone(), GalleryMsg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
