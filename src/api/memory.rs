// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Exo-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Exo and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! In-memory catalog used by the demo mode and by tests.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::Cursor;
use std::sync::Mutex;

use image::{ImageFormat, Rgba, RgbaImage};

use super::{ApiError, TechnologyApi};
use crate::technology::{
    compare_names, Page, PageQuery, SortDir, Technology, TechnologyId, TechnologyRequest,
};

#[derive(Debug, Default)]
struct Catalog {
    technologies: BTreeMap<TechnologyId, Technology>,
    icons: HashMap<TechnologyId, Vec<u8>>,
    next_id: TechnologyId,
    fail_next: Option<ApiError>,
    calls: CallCounts,
    token: Option<String>,
}

/// Number of calls per operation, for assertions in tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub list: usize,
    pub get: usize,
    pub create: usize,
    pub update: usize,
    pub delete: usize,
    pub upload_icon: usize,
}

#[derive(Debug, Default)]
pub struct MemoryTechnologyApi {
    inner: Mutex<Catalog>,
}

impl MemoryTechnologyApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_technologies(technologies: impl IntoIterator<Item = Technology>) -> Self {
        let api = Self::new();
        for tech in technologies {
            api.insert(tech);
        }
        api
    }

    /// Catalog used by `exo --demo`, with a generated icon per entry.
    pub fn demo() -> Self {
        let api = Self::new();
        let entries: [(&str, &str, &str, &str, [u8; 3]); 10] = [
            ("Rust", "Backend", "Systems language with a strict borrow checker.", "https://www.rust-lang.org", [222, 165, 132]),
            ("Spring Boot", "Backend", "Opinionated Java service framework.", "https://spring.io/projects/spring-boot", [109, 179, 63]),
            ("PostgreSQL", "Backend", "Relational database.", "https://www.postgresql.org", [51, 103, 145]),
            ("React", "Frontend", "Component-based UI library.", "https://react.dev", [97, 218, 251]),
            ("TypeScript", "Frontend", "Typed superset of JavaScript.", "https://www.typescriptlang.org", [49, 120, 198]),
            ("Three.js", "Frontend", "3D rendering for the web.", "https://threejs.org", [240, 240, 240]),
            ("Docker", "DevOps", "Container builds and runtime.", "https://www.docker.com", [36, 150, 237]),
            ("GitHub Actions", "DevOps", "CI pipelines.", "https://github.com/features/actions", [32, 136, 255]),
            ("Blender", "Design", "3D modelling and animation.", "https://www.blender.org", [234, 118, 0]),
            ("Figma", "Design", "Interface design tool.", "https://www.figma.com", [162, 89, 255]),
        ];
        for (name, category, description, link, color) in entries {
            let id = api.insert(Technology {
                name: name.to_owned(),
                category: Some(category.to_owned()),
                description: Some(description.to_owned()),
                link: Some(link.to_owned()),
                ..Technology::default()
            });
            if let Some(bytes) = disc_icon_png(color) {
                api.set_icon(id, bytes);
            }
        }
        api
    }

    /// Inserts `tech`, assigning a fresh id when it has none. Returns the id.
    pub fn insert(&self, mut tech: Technology) -> TechnologyId {
        let mut catalog = self.lock();
        let id = match tech.id {
            Some(id) => id,
            None => {
                catalog.next_id += 1;
                catalog.next_id
            }
        };
        catalog.next_id = catalog.next_id.max(id);
        tech.id = Some(id);
        if tech.icon_string.is_none() {
            tech.icon_string = Some(format!("icons/{id}.png"));
        }
        catalog.technologies.insert(id, tech);
        id
    }

    pub fn set_icon(&self, id: TechnologyId, bytes: Vec<u8>) {
        self.lock().icons.insert(id, bytes);
    }

    /// Makes the next call of any operation fail with `error`.
    pub fn fail_next(&self, error: ApiError) {
        self.lock().fail_next = Some(error);
    }

    pub fn calls(&self) -> CallCounts {
        self.lock().calls
    }

    pub fn snapshot(&self) -> Vec<Technology> {
        self.lock().technologies.values().cloned().collect()
    }

    pub fn token(&self) -> Option<String> {
        self.lock().token.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Catalog> {
        // A poisoned lock only means a panicking test thread; the data is still usable.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Catalog {
    fn check_failure(&mut self) -> Result<(), ApiError> {
        match self.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn existing(&self, id: TechnologyId) -> Result<&Technology, ApiError> {
        self.technologies.get(&id).ok_or(ApiError::NotFound(id))
    }
}

impl TechnologyApi for MemoryTechnologyApi {
    fn list(&self, query: &PageQuery) -> Result<Page<Technology>, ApiError> {
        let mut catalog = self.lock();
        catalog.calls.list += 1;
        catalog.check_failure()?;

        let mut all = catalog.technologies.values().cloned().collect::<Vec<_>>();
        all.sort_by(|a, b| compare_names(&a.name, &b.name));
        if query.sort_dir == SortDir::Desc {
            all.reverse();
        }
        let total_elements = all.len() as u64;
        let size = query.size.max(1) as usize;
        let total_pages = all.len().div_ceil(size) as u32;
        let content = all.into_iter().skip(query.page as usize * size).take(size).collect();
        Ok(Page {
            content,
            total_elements,
            total_pages,
        })
    }

    fn get(&self, id: TechnologyId) -> Result<Technology, ApiError> {
        let mut catalog = self.lock();
        catalog.calls.get += 1;
        catalog.check_failure()?;
        catalog.existing(id).cloned()
    }

    fn create(&self, request: &TechnologyRequest) -> Result<Technology, ApiError> {
        {
            let mut catalog = self.lock();
            catalog.calls.create += 1;
            catalog.check_failure()?;
        }
        let id = self.insert(Technology {
            name: request.name.clone(),
            description: request.description.clone(),
            link: request.link.clone(),
            icon_string: request.icon_path.clone(),
            category: request.category.clone(),
            ..Technology::default()
        });
        self.get_untracked(id)
    }

    fn update(
        &self,
        id: TechnologyId,
        request: &TechnologyRequest,
    ) -> Result<Technology, ApiError> {
        let mut catalog = self.lock();
        catalog.calls.update += 1;
        catalog.check_failure()?;
        let current = catalog.existing(id)?.clone();
        let updated = Technology {
            id: Some(id),
            name: request.name.clone(),
            description: request.description.clone(),
            link: request.link.clone(),
            icon_string: request.icon_path.clone().or(current.icon_string),
            category: request.category.clone(),
            created_at: current.created_at,
            updated_at: current.updated_at,
        };
        catalog.technologies.insert(id, updated.clone());
        Ok(updated)
    }

    fn delete(&self, id: TechnologyId) -> Result<(), ApiError> {
        let mut catalog = self.lock();
        catalog.calls.delete += 1;
        catalog.check_failure()?;
        catalog.technologies.remove(&id).ok_or(ApiError::NotFound(id))?;
        catalog.icons.remove(&id);
        Ok(())
    }

    fn categories(&self) -> Result<Vec<String>, ApiError> {
        let mut catalog = self.lock();
        catalog.check_failure()?;
        let categories = catalog
            .technologies
            .values()
            .filter_map(|tech| tech.category.clone())
            .filter(|category| !category.trim().is_empty())
            .collect::<BTreeSet<_>>();
        Ok(categories.into_iter().collect())
    }

    fn icon(&self, id: TechnologyId) -> Result<Vec<u8>, ApiError> {
        let mut catalog = self.lock();
        catalog.check_failure()?;
        catalog.existing(id)?;
        catalog.icons.get(&id).cloned().ok_or(ApiError::Status {
            code: 404,
            message: "no icon".to_owned(),
        })
    }

    fn upload_icon(
        &self,
        id: TechnologyId,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<Technology, ApiError> {
        let mut catalog = self.lock();
        catalog.calls.upload_icon += 1;
        catalog.check_failure()?;
        let mut tech = catalog.existing(id)?.clone();
        tech.icon_string = Some(format!("icons/{id}-{file_name}"));
        catalog.icons.insert(id, bytes.to_vec());
        catalog.technologies.insert(id, tech.clone());
        Ok(tech)
    }

    fn update_icon_path(&self, id: TechnologyId, path: &str) -> Result<Technology, ApiError> {
        let mut catalog = self.lock();
        catalog.calls.update += 1;
        catalog.check_failure()?;
        let mut tech = catalog.existing(id)?.clone();
        tech.icon_string = Some(path.to_owned());
        catalog.technologies.insert(id, tech.clone());
        Ok(tech)
    }

    fn set_token(&self, token: Option<String>) {
        self.lock().token = token;
    }
}

impl MemoryTechnologyApi {
    fn get_untracked(&self, id: TechnologyId) -> Result<Technology, ApiError> {
        self.lock().existing(id).cloned()
    }
}

/// A filled disc on a transparent background, encoded as PNG.
pub fn disc_icon_png(color: [u8; 3]) -> Option<Vec<u8>> {
    const SIZE: u32 = 48;
    let center = (SIZE as f32 - 1.0) / 2.0;
    let radius = SIZE as f32 * 0.45;
    let image = RgbaImage::from_fn(SIZE, SIZE, |x, y| {
        let dx = x as f32 - center;
        let dy = y as f32 - center;
        if (dx * dx + dy * dy).sqrt() <= radius {
            Rgba([color[0], color[1], color[2], 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).ok()?;
    Some(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Technology {
        Technology {
            name: name.to_owned(),
            ..Technology::default()
        }
    }

    #[test]
    fn list_sorts_by_name_and_pages() {
        let api = MemoryTechnologyApi::with_technologies([named("rust"), named("Go"), named("C")]);
        let page = api
            .list(&PageQuery {
                size: 2,
                ..PageQuery::all_by_name()
            })
            .expect("list");
        let names = page.content.iter().map(|tech| tech.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["C", "Go"]);
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn injected_failure_applies_once() {
        let api = MemoryTechnologyApi::with_technologies([named("Rust")]);
        api.fail_next(ApiError::Transport("offline".to_owned()));
        assert!(api.list(&PageQuery::all_by_name()).is_err());
        assert!(api.list(&PageQuery::all_by_name()).is_ok());
        assert_eq!(api.calls().list, 2);
    }

    #[test]
    fn categories_are_distinct_and_sorted() {
        let mut a = named("A");
        a.category = Some("Frontend".to_owned());
        let mut b = named("B");
        b.category = Some("Backend".to_owned());
        let mut c = named("C");
        c.category = Some("Frontend".to_owned());
        let api = MemoryTechnologyApi::with_technologies([a, b, c]);
        assert_eq!(api.categories().expect("categories"), vec!["Backend", "Frontend"]);
    }

    #[test]
    fn delete_missing_is_not_found() {
        let api = MemoryTechnologyApi::new();
        assert_eq!(api.delete(9), Err(ApiError::NotFound(9)));
    }

    #[test]
    fn demo_catalog_has_icons() {
        let api = MemoryTechnologyApi::demo();
        let first = api.snapshot().into_iter().next().expect("demo entry");
        let icon = api.icon(first.id.expect("id")).expect("icon");
        assert!(icon.starts_with(&[0x89, b'P', b'N', b'G']));
    }
}
