//! Begin/end events around project serialization.

use crate::json::JsonObject;
use tsz_docs_models::ProjectReflection;

/// Payload of the serializer's begin and end events.
pub struct SerializeEvent<'a> {
    pub project: &'a ProjectReflection,
    pub project_root: &'a str,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

type BeginListener = Box<dyn Fn(&SerializeEvent<'_>)>;
type EndListener = Box<dyn Fn(&SerializeEvent<'_>, &mut JsonObject)>;

struct Entry<L> {
    id: ListenerId,
    priority: i32,
    listener: L,
}

/// Listener lists, each kept in descending priority order.
#[derive(Default)]
pub(super) struct Listeners {
    next_id: u32,
    begin: Vec<Entry<BeginListener>>,
    end: Vec<Entry<EndListener>>,
}

impl Listeners {
    fn alloc(&mut self) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(super) fn add_begin(&mut self, priority: i32, listener: BeginListener) -> ListenerId {
        let id = self.alloc();
        insert_sorted(&mut self.begin, Entry { id, priority, listener });
        id
    }

    pub(super) fn add_end(&mut self, priority: i32, listener: EndListener) -> ListenerId {
        let id = self.alloc();
        insert_sorted(&mut self.end, Entry { id, priority, listener });
        id
    }

    pub(super) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.begin.len() + self.end.len();
        self.begin.retain(|e| e.id != id);
        self.end.retain(|e| e.id != id);
        self.begin.len() + self.end.len() != before
    }

    pub(super) fn fire_begin(&self, event: &SerializeEvent<'_>) {
        for entry in &self.begin {
            (entry.listener)(event);
        }
    }

    pub(super) fn fire_end(&self, event: &SerializeEvent<'_>, output: &mut JsonObject) {
        for entry in &self.end {
            (entry.listener)(event, output);
        }
    }
}

/// Insert after every entry with a priority greater than or equal to the
/// new one.
fn insert_sorted<L>(list: &mut Vec<Entry<L>>, entry: Entry<L>) {
    let index = list.partition_point(|e| e.priority >= entry.priority);
    list.insert(index, entry);
}
