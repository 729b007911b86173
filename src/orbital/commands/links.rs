use crate::error::{EntityKind, OrbitalError, Result};
use crate::library::Library;
use crate::model::{favicon_for, normalize_url, Link, LinkUpdate};
use crate::store::StorageBackend;

/// Append a new link to `collection_id`.
pub fn create<B: StorageBackend>(
    library: &mut Library<B>,
    collection_id: &str,
    title: &str,
    url: &str,
    comment: Option<String>,
) -> Result<Link> {
    if library.collection(collection_id).is_none() {
        return Err(OrbitalError::dangling(EntityKind::Collection, collection_id));
    }
    let link = Link::new(collection_id, title, url, comment);
    push(library, link.clone());
    Ok(link)
}

pub(crate) fn push<B: StorageBackend>(library: &mut Library<B>, link: Link) {
    let mut links = library.links().to_vec();
    links.push(link);
    library.set_links(links);
}

/// Apply a partial update. Unknown ids are a no-op and return `None`.
pub fn update<B: StorageBackend>(
    library: &mut Library<B>,
    id: &str,
    update: LinkUpdate,
) -> Option<Link> {
    let mut links = library.links().to_vec();
    let link = links.iter_mut().find(|l| l.id == id)?;

    if let Some(title) = update.title {
        link.title = title;
    }
    if let Some(url) = update.url {
        let url = normalize_url(&url);
        if url != link.url {
            link.favicon = favicon_for(&url);
            link.url = url;
        }
    }
    if let Some(comment) = update.comment {
        link.comment = Some(comment).filter(|c| !c.is_empty());
    }

    let updated = link.clone();
    library.set_links(links);
    Some(updated)
}

/// Remove a link. Returns the removed link, `None` if it did not exist.
pub fn remove<B: StorageBackend>(library: &mut Library<B>, id: &str) -> Option<Link> {
    let removed = library.link(id).cloned()?;
    let links = library
        .links()
        .iter()
        .filter(|l| l.id != id)
        .cloned()
        .collect();
    library.set_links(links);
    Some(removed)
}
