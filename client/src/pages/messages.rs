//! Project chat page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Opens the realtime link for the signed-in user and selected project,
//! loads history over REST, and closes the link when the page unmounts.
//! Identity changes close the link from `util::identity` instead.

use leptos::prelude::*;

use crate::net::message_stream::{CloseReason, RealtimeLink, StreamKey, outgoing_message};
use crate::pages::Backend;
use crate::state::auth::AuthState;
use crate::state::chat::{ChatState, ConnectionStatus};
use crate::util::validation::{CHAT_MESSAGE_MAX_LEN, remaining_chars, require, within_limit};

#[component]
pub fn MessagesPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let chat = expect_context::<RwSignal<ChatState>>();
    let realtime = expect_context::<RwSignal<RealtimeLink>>();
    let backend = Backend::from_context();

    let draft = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);

    let stream_key = {
        let session = backend.session.clone();
        Memo::new(move |_| {
            let user_id = auth.with(|a| a.user_id().map(str::to_owned))?;
            let project_id = session.active_selected_project()?;
            Some(StreamKey { user_id, project_id })
        })
    };

    Effect::new(move || {
        let Some(key) = stream_key.get() else {
            return;
        };
        chat.update(|c| c.reset_for(&key.project_id));

        let mut opened = None;
        realtime.update(|link| opened = link.open(key.clone()));
        #[cfg(feature = "hydrate")]
        if let Some(stream) = opened {
            crate::net::message_stream::spawn_message_stream(backend.config.clone(), stream, chat);
        }
        #[cfg(not(feature = "hydrate"))]
        drop(opened);

        let Some(token) = backend.session.token() else {
            return;
        };
        let backend = backend.clone();
        leptos::task::spawn_local(async move {
            match crate::net::api::list_messages(&backend.config, &token, &key.project_id).await {
                Ok(history) => chat.update(|c| {
                    if c.project_id.as_deref() == Some(key.project_id.as_str()) {
                        c.load_history(history);
                    }
                }),
                Err(e) => backend.report(&e, error),
            }
        });
    });

    on_cleanup(move || {
        realtime.update(|link| {
            link.close(CloseReason::LEFT_CHAT);
        });
    });

    let on_send = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let text = draft.get();
        let checked = require("Message", &text)
            .and_then(|content| within_limit("Message", content, CHAT_MESSAGE_MAX_LEN).map(|()| content.to_owned()));
        let content = match checked {
            Ok(content) => content,
            Err(e) => {
                error.set(Some(e.to_string()));
                return;
            }
        };
        if realtime.with_untracked(|link| link.send(outgoing_message(&content))) {
            draft.set(String::new());
            error.set(None);
        } else {
            error.set(Some("Chat is not connected.".to_owned()));
        }
    };

    let status_label = move || match chat.with(|c| c.connection) {
        ConnectionStatus::Connected => "Connected",
        ConnectionStatus::Connecting => "Connecting...",
        ConnectionStatus::Disconnected => "Offline",
    };

    view! {
        <div class="messages-page">
            <header class="messages-page__header">
                <h1>"Messages"</h1>
                <span class="messages-page__status">{status_label}</span>
            </header>
            <ul class="messages-page__list">
                {move || {
                    chat.with(|c| c.messages.clone())
                        .into_iter()
                        .map(|msg| {
                            view! {
                                <li class="chat-message">
                                    <span class="chat-message__sender">{msg.sender_name}</span>
                                    <span class="chat-message__content">{msg.content}</span>
                                </li>
                            }
                        })
                        .collect_view()
                }}
            </ul>
            <Show when=move || error.get().is_some() || chat.with(|c| c.error.is_some())>
                <p class="messages-page__error">
                    {move || error.get().or_else(|| chat.with(|c| c.error.clone())).unwrap_or_default()}
                </p>
            </Show>
            <form class="messages-page__composer" on:submit=on_send>
                <textarea
                    class="messages-page__input"
                    placeholder="Write a message"
                    prop:value=move || draft.get()
                    on:input=move |ev| draft.set(event_target_value(&ev))
                ></textarea>
                <span
                    class="messages-page__counter"
                    class:messages-page__counter--over=move || remaining_chars(&draft.get(), CHAT_MESSAGE_MAX_LEN) < 0
                >
                    {move || remaining_chars(&draft.get(), CHAT_MESSAGE_MAX_LEN)}
                </span>
                <button class="btn" type="submit">
                    "Send"
                </button>
            </form>
        </div>
    }
}
