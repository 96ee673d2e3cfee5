use crate::models::Favorite;
use crate::store::state::StateCell;
use log::debug;
use tokio::sync::watch;

/// User-curated favorites. Transitions are total and report whether they changed anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoritesState {
    pub items: Vec<Favorite>,
}

impl FavoritesState {
    /// Insert unless a favorite with the same id exists.
    pub fn add(&mut self, favorite: Favorite) -> bool {
        if self.contains(&favorite.id) {
            return false;
        }
        self.items.push(favorite);
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|f| f.id != id);
        self.items.len() != before
    }

    pub fn update_notes(&mut self, id: &str, notes: &str) -> bool {
        match self.items.iter_mut().find(|f| f.id == id) {
            Some(fav) if fav.notes != notes => {
                fav.notes = notes.to_string();
                true
            }
            _ => false,
        }
    }

    /// Remove if present, otherwise add. Returns whether `favorite.id` is now a favorite.
    pub fn toggle(&mut self, favorite: Favorite) -> bool {
        if self.remove(&favorite.id) {
            false
        } else {
            self.add(favorite)
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|f| f.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Favorite> {
        self.items.iter().find(|f| f.id == id)
    }
}

/// Local-only favorites with change notifications.
///
/// Subscribers wake only when a transition actually changed the list.
#[derive(Debug, Default)]
pub struct FavoritesStore {
    state: StateCell<FavoritesState>,
}

impl FavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore from flat records; later duplicates of an id are ignored.
    pub fn from_items(items: Vec<Favorite>) -> Self {
        let mut state = FavoritesState::default();
        for fav in items {
            state.add(fav);
        }
        Self {
            state: StateCell::new(state),
        }
    }

    pub fn get_state(&self) -> FavoritesState {
        self.state.get_state()
    }

    pub fn subscribe(&self) -> watch::Receiver<FavoritesState> {
        self.state.subscribe()
    }

    /// Flat records for persistence.
    pub fn items(&self) -> Vec<Favorite> {
        self.state.with_state(|s| s.items.clone())
    }

    pub fn len(&self) -> usize {
        self.state.with_state(|s| s.items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.with_state(|s| s.contains(id))
    }

    pub fn get(&self, id: &str) -> Option<Favorite> {
        self.state.with_state(|s| s.get(id).cloned())
    }

    pub fn add(&self, favorite: Favorite) -> bool {
        let id = favorite.id.clone();
        let changed = self.state.update_if(|s| s.add(favorite));
        debug!("favorite add {}: changed={}", id, changed);
        changed
    }

    pub fn remove(&self, id: &str) -> bool {
        let changed = self.state.update_if(|s| s.remove(id));
        debug!("favorite remove {}: changed={}", id, changed);
        changed
    }

    pub fn update_notes(&self, id: &str, notes: &str) -> bool {
        let changed = self.state.update_if(|s| s.update_notes(id, notes));
        debug!("favorite notes {}: changed={}", id, changed);
        changed
    }

    pub fn toggle(&self, favorite: Favorite) -> bool {
        let mut now_favorite = false;
        self.state.update(|s| now_favorite = s.toggle(favorite));
        now_favorite
    }
}
