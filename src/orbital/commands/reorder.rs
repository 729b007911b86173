//! Reordering and re-parenting.
//!
//! Positions are sequence indexes in the global collection and link vectors.
//! The placement rule, shared by collections and same-collection links: the
//! dragged item takes the index the target held, so dragging forward lands it
//! right after the target and dragging backward lands it right before. A link
//! dropped on a link of another collection has no relative position there, so
//! it is always placed immediately before the target, with the target index
//! looked up after the dragged link was taken out.
//!
//! Nothing here fails: unknown ids and self-targets return `false` and leave the
//! sequences untouched. Ids never change; only positions and, for links,
//! `collection_id`.

use crate::library::Library;
use crate::store::StorageBackend;

/// Move a collection to the slot held by `target_id`.
pub fn reorder_collections<B: StorageBackend>(
    library: &mut Library<B>,
    dragged_id: &str,
    target_id: &str,
) -> bool {
    if dragged_id == target_id {
        return false;
    }
    let collections = library.collections();
    let (Some(from), Some(to)) = (
        collections.iter().position(|c| c.id == dragged_id),
        collections.iter().position(|c| c.id == target_id),
    ) else {
        return false;
    };

    let reordered = move_to_slot(collections, from, to);
    library.set_collections(reordered);
    true
}

/// Move a link next to `target_id`, adopting the target's collection when the
/// two belong to different collections.
pub fn reorder_links<B: StorageBackend>(
    library: &mut Library<B>,
    dragged_id: &str,
    target_id: &str,
) -> bool {
    if dragged_id == target_id {
        return false;
    }
    let links = library.links();
    let (Some(from), Some(to)) = (
        links.iter().position(|l| l.id == dragged_id),
        links.iter().position(|l| l.id == target_id),
    ) else {
        return false;
    };

    let target_collection = &links[to].collection_id;
    let reordered = if links[from].collection_id == *target_collection {
        move_to_slot(links, from, to)
    } else {
        let target_collection = target_collection.clone();
        let mut reordered = links.to_vec();
        let mut moved = reordered.remove(from);
        moved.collection_id = target_collection;
        let anchor = reordered
            .iter()
            .position(|l| l.id == target_id)
            .unwrap_or(reordered.len());
        reordered.insert(anchor, moved);
        reordered
    };

    library.set_links(reordered);
    true
}

/// Hand a link to another collection, placing it after that collection's last
/// link (or at the end of the sequence when the collection is empty).
pub fn reparent_link<B: StorageBackend>(
    library: &mut Library<B>,
    link_id: &str,
    collection_id: &str,
) -> bool {
    if library.collection(collection_id).is_none() {
        return false;
    }
    let links = library.links();
    let Some(from) = links.iter().position(|l| l.id == link_id) else {
        return false;
    };
    if links[from].collection_id == collection_id {
        return false;
    }

    let mut reordered = links.to_vec();
    let mut moved = reordered.remove(from);
    moved.collection_id = collection_id.to_string();
    let anchor = reordered
        .iter()
        .rposition(|l| l.collection_id == collection_id)
        .map(|i| i + 1)
        .unwrap_or(reordered.len());
    reordered.insert(anchor, moved);

    library.set_links(reordered);
    true
}

/// Take the element at `from` out and insert it at `to`, both indexes as they
/// were before the removal.
fn move_to_slot<T: Clone>(seq: &[T], from: usize, to: usize) -> Vec<T> {
    let mut out = seq.to_vec();
    let moved = out.remove(from);
    out.insert(to, moved);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{collections, links};
    use crate::model::{Collection, Link};
    use crate::store::memory::MemBackend;

    fn library() -> Library<MemBackend> {
        Library::load(MemBackend::new()).unwrap()
    }

    fn names(cols: &[Collection]) -> Vec<&str> {
        cols.iter().map(|c| c.name.as_str()).collect()
    }

    fn titles(links: &[Link]) -> Vec<&str> {
        links.iter().map(|l| l.title.as_str()).collect()
    }

    /// Collections in sequence order: a, b, c, d.
    fn four_collections(lib: &mut Library<MemBackend>) -> Vec<Collection> {
        let mut made: Vec<Collection> = ["d", "c", "b", "a"]
            .iter()
            .map(|n| collections::create(lib, "space-home", Some(n)).unwrap())
            .collect();
        made.reverse();
        made
    }

    #[test]
    fn move_to_slot_forward_and_backward() {
        let seq = ["a", "b", "c", "d"];
        assert_eq!(move_to_slot(&seq, 0, 2), ["b", "c", "a", "d"]);
        assert_eq!(move_to_slot(&seq, 3, 1), ["a", "d", "b", "c"]);
    }

    #[test]
    fn collection_dragged_forward_lands_after_target() {
        let mut lib = library();
        let cols = four_collections(&mut lib);
        assert!(reorder_collections(&mut lib, &cols[0].id, &cols[2].id));
        assert_eq!(names(lib.collections()), ["b", "c", "a", "d"]);
    }

    #[test]
    fn collection_dragged_backward_lands_before_target() {
        let mut lib = library();
        let cols = four_collections(&mut lib);
        assert!(reorder_collections(&mut lib, &cols[3].id, &cols[1].id));
        assert_eq!(names(lib.collections()), ["a", "d", "b", "c"]);
    }

    #[test]
    fn collection_reorder_noops() {
        let mut lib = library();
        let cols = four_collections(&mut lib);
        let writes = lib.backend().write_count();

        assert!(!reorder_collections(&mut lib, &cols[0].id, &cols[0].id));
        assert!(!reorder_collections(&mut lib, "col-nope", &cols[0].id));
        assert!(!reorder_collections(&mut lib, &cols[0].id, "col-nope"));
        assert_eq!(names(lib.collections()), ["a", "b", "c", "d"]);
        assert_eq!(lib.backend().write_count(), writes);
    }

    #[test]
    fn link_reorder_onto_itself_is_noop() {
        let mut lib = library();
        let col = collections::create(&mut lib, "space-home", Some("C1")).unwrap();
        let l1 = links::create(&mut lib, &col.id, "Example", "example.com", None).unwrap();
        let before = lib.links().to_vec();

        assert!(!reorder_links(&mut lib, &l1.id, &l1.id));
        assert_eq!(lib.links(), before.as_slice());
    }

    #[test]
    fn link_reorder_within_collection() {
        let mut lib = library();
        let col = collections::create(&mut lib, "space-home", Some("C1")).unwrap();
        let made: Vec<Link> = ["1", "2", "3"]
            .iter()
            .map(|t| links::create(&mut lib, &col.id, t, "x.com", None).unwrap())
            .collect();

        assert!(reorder_links(&mut lib, &made[0].id, &made[2].id));
        assert_eq!(titles(lib.links()), ["2", "3", "1"]);
        assert!(reorder_links(&mut lib, &made[0].id, &made[1].id));
        assert_eq!(titles(lib.links()), ["1", "2", "3"]);
    }

    #[test]
    fn link_dragged_onto_other_collection_link_is_reparented_before_target() {
        let mut lib = library();
        let c1 = collections::create(&mut lib, "space-home", Some("C1")).unwrap();
        let c2 = collections::create(&mut lib, "space-home", Some("C2")).unwrap();
        let a1 = links::create(&mut lib, &c1.id, "a1", "a.com", None).unwrap();
        let b1 = links::create(&mut lib, &c2.id, "b1", "b.com", None).unwrap();
        let b2 = links::create(&mut lib, &c2.id, "b2", "b.com", None).unwrap();

        assert!(reorder_links(&mut lib, &a1.id, &b2.id));

        assert_eq!(titles(lib.links()), ["b1", "a1", "b2"]);
        let moved = lib.link(&a1.id).unwrap();
        assert_eq!(moved.collection_id, c2.id);
        assert_eq!(lib.collection_link_count(&c1.id), 0);
        assert_eq!(lib.link(&b1.id).unwrap().collection_id, c2.id);
    }

    #[test]
    fn cross_collection_insert_before_target_when_dragged_sits_earlier() {
        let mut lib = library();
        let c1 = collections::create(&mut lib, "space-home", Some("C1")).unwrap();
        let c2 = collections::create(&mut lib, "space-home", Some("C2")).unwrap();
        let b1 = links::create(&mut lib, &c2.id, "b1", "b.com", None).unwrap();
        let a1 = links::create(&mut lib, &c1.id, "a1", "a.com", None).unwrap();

        assert!(reorder_links(&mut lib, &a1.id, &b1.id));
        assert_eq!(titles(lib.links()), ["a1", "b1"]);
        assert_eq!(lib.link(&a1.id).unwrap().collection_id, c2.id);
    }

    #[test]
    fn reorders_never_touch_ids_or_other_owners() {
        let mut lib = library();
        let c1 = collections::create(&mut lib, "space-home", Some("C1")).unwrap();
        let c2 = collections::create(&mut lib, "space-home", Some("C2")).unwrap();
        let a = links::create(&mut lib, &c1.id, "a", "a.com", None).unwrap();
        let b = links::create(&mut lib, &c1.id, "b", "b.com", None).unwrap();
        let c = links::create(&mut lib, &c2.id, "c", "c.com", None).unwrap();

        let mut ids_before: Vec<String> = lib.links().iter().map(|l| l.id.clone()).collect();
        ids_before.sort();

        reorder_links(&mut lib, &b.id, &a.id);
        reorder_links(&mut lib, &a.id, &c.id);
        reorder_collections(&mut lib, &c1.id, &c2.id);

        let mut ids_after: Vec<String> = lib.links().iter().map(|l| l.id.clone()).collect();
        ids_after.sort();
        assert_eq!(ids_before, ids_after);
        assert_eq!(lib.link(&b.id).unwrap().collection_id, c1.id);
        assert_eq!(lib.link(&c.id).unwrap().collection_id, c2.id);
        assert_eq!(lib.link(&a.id).unwrap().collection_id, c2.id);
    }

    #[test]
    fn reparent_appends_after_last_link_of_target() {
        let mut lib = library();
        let c1 = collections::create(&mut lib, "space-home", Some("C1")).unwrap();
        let c2 = collections::create(&mut lib, "space-home", Some("C2")).unwrap();
        let b1 = links::create(&mut lib, &c2.id, "b1", "b.com", None).unwrap();
        let a1 = links::create(&mut lib, &c1.id, "a1", "a.com", None).unwrap();
        links::create(&mut lib, &c1.id, "a2", "a.com", None).unwrap();

        assert!(reparent_link(&mut lib, &a1.id, &c2.id));
        assert_eq!(titles(lib.links()), ["b1", "a1", "a2"]);
        let owned: Vec<&str> = lib
            .links_in_collection(&c2.id)
            .map(|l| l.id.as_str())
            .collect();
        assert_eq!(owned, [b1.id.as_str(), a1.id.as_str()]);
    }

    #[test]
    fn reparent_into_empty_collection_goes_to_end() {
        let mut lib = library();
        let c1 = collections::create(&mut lib, "space-home", Some("C1")).unwrap();
        let empty = collections::create(&mut lib, "space-home", Some("Empty")).unwrap();
        let a1 = links::create(&mut lib, &c1.id, "a1", "a.com", None).unwrap();
        links::create(&mut lib, &c1.id, "a2", "a.com", None).unwrap();

        assert!(reparent_link(&mut lib, &a1.id, &empty.id));
        assert_eq!(titles(lib.links()), ["a2", "a1"]);
    }

    #[test]
    fn reparent_noops() {
        let mut lib = library();
        let c1 = collections::create(&mut lib, "space-home", Some("C1")).unwrap();
        let a1 = links::create(&mut lib, &c1.id, "a1", "a.com", None).unwrap();

        assert!(!reparent_link(&mut lib, &a1.id, &c1.id));
        assert!(!reparent_link(&mut lib, &a1.id, "col-nope"));
        assert!(!reparent_link(&mut lib, "link-nope", &c1.id));
        assert_eq!(lib.link(&a1.id).unwrap().collection_id, c1.id);
    }
}
