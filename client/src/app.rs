//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::protected_route::ProtectedRoute;
use crate::components::session_bar::SessionBar;
use crate::config::ClientConfig;
use crate::net::message_stream::RealtimeLink;
use crate::pages::{
    login::LoginPage,
    messages::MessagesPage,
    oauth_callback::OAuthCallbackPage,
    project_section::{ProjectSection, ProjectSectionPage},
    projects::ProjectsPage,
    register::RegisterPage,
};
use crate::state::{auth::AuthState, cache::QueryCache, chat::ChatState, session::SessionStore};
use crate::util::identity::SignalTeardown;
use crate::util::route_gate::GateConfig;
use crate::util::storage::BrowserStorage;

/// Session store provided to every page.
pub type AppSession = SessionStore<BrowserStorage>;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides all shared state contexts, starts the auth check in the browser,
/// and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = RwSignal::new(AuthState::default());
    let cache = RwSignal::new(QueryCache::default());
    let chat = RwSignal::new(ChatState::default());
    let realtime = RwSignal::new(RealtimeLink::default());
    let session = AppSession::default();
    let config = ClientConfig::from_build_env();

    provide_context(auth);
    provide_context(cache);
    provide_context(chat);
    provide_context(realtime);
    provide_context(SignalTeardown { auth, cache, chat, realtime });
    provide_context(session.clone());
    provide_context(config.clone());
    provide_context(GateConfig::default());

    #[cfg(feature = "hydrate")]
    crate::util::auth::install_startup_check(auth, session, config);
    #[cfg(not(feature = "hydrate"))]
    let _ = (session, config);

    view! {
        <Stylesheet id="leptos" href="/pkg/devhive.css"/>
        <Title text="DevHive"/>

        <Router>
            <SessionBar/>
            <main>
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("") view=LoginPage/>
                    <Route path=StaticSegment("register") view=RegisterPage/>
                    <Route path=(StaticSegment("auth"), StaticSegment("callback")) view=OAuthCallbackPage/>
                    <Route
                        path=StaticSegment("projects")
                        view=|| view! { <ProtectedRoute><ProjectsPage/></ProtectedRoute> }
                    />
                    <Route path=StaticSegment("project") view=|| protected_section(ProjectSection::Overview)/>
                    <Route path=StaticSegment("board") view=|| protected_section(ProjectSection::Board)/>
                    <Route
                        path=(StaticSegment("board"), ParamSegment("id"))
                        view=|| protected_section(ProjectSection::Board)
                    />
                    <Route path=StaticSegment("backlog") view=|| protected_section(ProjectSection::Backlog)/>
                    <Route path=StaticSegment("sprint") view=|| protected_section(ProjectSection::Sprint)/>
                    <Route
                        path=(StaticSegment("sprint"), ParamSegment("id"))
                        view=|| protected_section(ProjectSection::Sprint)
                    />
                    <Route path=StaticSegment("contacts") view=|| protected_section(ProjectSection::Contacts)/>
                    <Route
                        path=StaticSegment("messages")
                        view=|| view! { <ProtectedRoute><MessagesPage/></ProtectedRoute> }
                    />
                </Routes>
            </main>
        </Router>
    }
}

fn protected_section(section: ProjectSection) -> impl IntoView {
    view! {
        <ProtectedRoute>
            <ProjectSectionPage section/>
        </ProtectedRoute>
    }
}
