//! Project selection page: list, select, and create projects.
//!
//! SYSTEM CONTEXT
//! ==============
//! Project-scoped routes redirect here when no project is selected. Picking
//! a project records it for the signed-in user in the session store, which
//! is what the route gate checks.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::net::types::Project;
use crate::pages::Backend;
use crate::state::auth::AuthState;
use crate::state::cache::QueryCache;
use crate::util::validation::{PROJECT_DESCRIPTION_MAX_LEN, PROJECT_NAME_MAX_LEN, ProjectForm, remaining_chars};

/// Route a selected project lands on.
pub const PROJECT_HOME_ROUTE: &str = "/project";

#[component]
pub fn ProjectsPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let cache = expect_context::<RwSignal<QueryCache>>();
    let backend = Backend::from_context();
    let navigate = use_navigate();

    let error = RwSignal::new(None::<String>);
    let loading = RwSignal::new(false);

    // Fetch once per cache generation; an identity switch empties the cache.
    let fetch_backend = backend.clone();
    Effect::new(move || {
        if cache.with(|c| c.projects.is_some()) || loading.get_untracked() {
            return;
        }
        let Some(token) = fetch_backend.session.token() else {
            return;
        };
        loading.set(true);
        let backend = fetch_backend.clone();
        leptos::task::spawn_local(async move {
            match crate::net::api::list_projects(&backend.config, &token).await {
                Ok(projects) => {
                    leptos::logging::log!("loaded {} projects", projects.len());
                    cache.update(|c| c.store_projects(projects));
                    error.set(None);
                }
                Err(e) => backend.report(&e, error),
            }
            loading.set(false);
        });
    });

    let select_backend = backend.clone();
    let on_select = Callback::new(move |project_id: String| {
        let Some(user_id) = auth.with_untracked(|a| a.user_id().map(str::to_owned)) else {
            return;
        };
        select_backend.session.set_selected_project(&user_id, &project_id);
        navigate(PROJECT_HOME_ROUTE, NavigateOptions::default());
    });

    let selected = Memo::new(move |_| {
        let _ = auth.get();
        backend.session.active_selected_project()
    });

    view! {
        <div class="projects-page">
            <header class="projects-page__header">
                <h1>"Your projects"</h1>
            </header>
            <Show when=move || error.get().is_some()>
                <p class="projects-page__error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <Show
                when=move || cache.with(|c| c.projects.is_some())
                fallback=move || view! { <p>"Loading projects..."</p> }
            >
                <ul class="projects-page__list">
                    {move || {
                        let current = selected.get();
                        cache
                            .with(|c| c.projects.clone().unwrap_or_default())
                            .into_iter()
                            .map(|project| {
                                let is_current = current.as_deref() == Some(project.id.as_str());
                                view! { <ProjectRow project is_current on_select/> }
                            })
                            .collect_view()
                    }}
                </ul>
            </Show>
            <CreateProjectForm on_select/>
        </div>
    }
}

#[component]
fn ProjectRow(project: Project, is_current: bool, on_select: Callback<String>) -> impl IntoView {
    let id = project.id.clone();
    view! {
        <li class="project-row" class:project-row--current=is_current>
            <button class="project-row__open" on:click=move |_| on_select.run(id.clone())>
                <span class="project-row__name">{project.name}</span>
                <span class="project-row__description">{project.description}</span>
            </button>
        </li>
    }
}

#[component]
fn CreateProjectForm(on_select: Callback<String>) -> impl IntoView {
    let cache = expect_context::<RwSignal<QueryCache>>();
    let backend = Backend::from_context();
    let name = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let form = match ProjectForm::validate(&name.get(), &description.get()) {
            Ok(form) => form,
            Err(e) => {
                error.set(Some(e.to_string()));
                return;
            }
        };
        let Some(token) = backend.session.token() else {
            return;
        };
        busy.set(true);
        let backend = backend.clone();
        leptos::task::spawn_local(async move {
            match crate::net::api::create_project(&backend.config, &token, &form.name, &form.description).await {
                Ok(project) => {
                    let id = project.id.clone();
                    cache.update(|c| c.store_project(project));
                    name.set(String::new());
                    description.set(String::new());
                    error.set(None);
                    busy.set(false);
                    on_select.run(id);
                }
                Err(e) => {
                    backend.report(&e, error);
                    busy.set(false);
                }
            }
        });
    };

    view! {
        <form class="project-form" on:submit=on_submit>
            <h2>"New project"</h2>
            <input
                class="project-form__name"
                type="text"
                placeholder="Project name"
                prop:value=move || name.get()
                on:input=move |ev| name.set(event_target_value(&ev))
            />
            <span
                class="project-form__counter"
                class:project-form__counter--over=move || remaining_chars(&name.get(), PROJECT_NAME_MAX_LEN) < 0
            >
                {move || remaining_chars(&name.get(), PROJECT_NAME_MAX_LEN)}
            </span>
            <textarea
                class="project-form__description"
                placeholder="Description"
                prop:value=move || description.get()
                on:input=move |ev| description.set(event_target_value(&ev))
            ></textarea>
            <span
                class="project-form__counter"
                class:project-form__counter--over=move || {
                    remaining_chars(&description.get(), PROJECT_DESCRIPTION_MAX_LEN) < 0
                }
            >
                {move || remaining_chars(&description.get(), PROJECT_DESCRIPTION_MAX_LEN)}
            </span>
            <Show when=move || error.get().is_some()>
                <p class="project-form__error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <button class="btn" type="submit" disabled=move || busy.get()>
                "Create"
            </button>
        </form>
    }
}
