//! Project-scoped pages (overview, board, backlog, sprint, contacts).
//!
//! These views only need the selected project's details; the work items
//! behind each section live in the backend and render as placeholders.

#[cfg(test)]
#[path = "project_section_test.rs"]
mod project_section_test;

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::pages::Backend;
use crate::state::auth::AuthState;
use crate::state::cache::QueryCache;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectSection {
    Overview,
    Board,
    Backlog,
    Sprint,
    Contacts,
}

impl ProjectSection {
    pub const ALL: [Self; 5] = [Self::Overview, Self::Board, Self::Backlog, Self::Sprint, Self::Contacts];

    pub fn title(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Board => "Board",
            Self::Backlog => "Backlog",
            Self::Sprint => "Sprint",
            Self::Contacts => "Contacts",
        }
    }

    /// First path segment of the section's route.
    pub fn segment(self) -> &'static str {
        match self {
            Self::Overview => "project",
            Self::Board => "board",
            Self::Backlog => "backlog",
            Self::Sprint => "sprint",
            Self::Contacts => "contacts",
        }
    }

    /// Whether the route accepts an `/:id` suffix for a single item.
    pub fn has_item_route(self) -> bool {
        matches!(self, Self::Board | Self::Sprint)
    }

    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.segment() == segment)
    }
}

#[component]
pub fn ProjectSectionPage(section: ProjectSection) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let cache = expect_context::<RwSignal<QueryCache>>();
    let backend = Backend::from_context();
    let params = use_params_map();

    let error = RwSignal::new(None::<String>);
    let project_id = {
        let session = backend.session.clone();
        Memo::new(move |_| {
            let _ = auth.get();
            session.active_selected_project()
        })
    };

    Effect::new(move || {
        let Some(id) = project_id.get() else {
            return;
        };
        if cache.with_untracked(|c| c.project(&id).is_some()) {
            return;
        }
        let Some(token) = backend.session.token() else {
            return;
        };
        let backend = backend.clone();
        leptos::task::spawn_local(async move {
            match crate::net::api::fetch_project(&backend.config, &token, &id).await {
                Ok(project) => cache.update(|c| c.store_project(project)),
                Err(e) => backend.report(&e, error),
            }
        });
    });

    let project = move || project_id.get().and_then(|id| cache.with(|c| c.project(&id).cloned()));
    let item_id = move || {
        if section.has_item_route() {
            params.with(|p| p.get("id"))
        } else {
            None
        }
    };

    view! {
        <div class="project-section">
            <header class="project-section__header">
                <h1>
                    {move || project().map(|p| p.name).unwrap_or_else(|| "Loading project...".to_owned())}
                </h1>
                <h2>{section.title()}</h2>
            </header>
            <Show when=move || error.get().is_some()>
                <p class="project-section__error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            {move || {
                match section {
                    ProjectSection::Overview => {
                        let description = project().map(|p| p.description).unwrap_or_default();
                        view! { <p class="project-section__description">{description}</p> }.into_any()
                    }
                    _ => {
                        match item_id() {
                            Some(id) => {
                                view! {
                                    <p class="project-section__item">
                                        {format!("{} item {id}", section.title())}
                                    </p>
                                }
                                    .into_any()
                            }
                            None => {
                                view! {
                                    <p class="project-section__empty">
                                        {format!("No {} items yet.", section.title().to_lowercase())}
                                    </p>
                                }
                                    .into_any()
                            }
                        }
                    }
                }
            }}
        </div>
    }
}
