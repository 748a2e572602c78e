//! Post feed, category browsing, and post create/edit pages.

#[cfg(test)]
#[path = "posts_test.rs"]
mod posts_test;

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::{use_params_map, use_query_map};
use serde_json::Value;

use super::required;
use crate::components::nav_bar::NavBar;
use crate::components::payload_view::{PayloadView, items};
use crate::net::request::MultipartForm;

/// Which listing endpoint feeds the home page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedSource {
    All,
    Category(String),
    Search(String),
}

/// A non-blank search query wins over a category, which wins over all posts.
#[must_use]
pub fn feed_source(category: Option<String>, query: Option<String>) -> FeedSource {
    let non_blank = |value: Option<String>| value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
    if let Some(q) = non_blank(query) {
        return FeedSource::Search(q);
    }
    match non_blank(category) {
        Some(category) => FeedSource::Category(category),
        None => FeedSource::All,
    }
}

/// Identifier of a post, comment or other record; numbers are stringified.
#[must_use]
pub fn record_id(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Distinct, sorted categories mentioned by `posts`.
#[must_use]
pub fn categories_from_posts(posts: &Value) -> Vec<String> {
    let mut categories: Vec<String> = items(posts, "posts")
        .iter()
        .filter_map(|post| post.get("category").and_then(Value::as_str))
        .map(str::trim)
        .filter(|category| !category.is_empty())
        .map(str::to_owned)
        .collect();
    categories.sort();
    categories.dedup();
    categories
}

/// Text fields of a create/edit post form.
///
/// # Errors
///
/// Returns a user-facing message if the title or content is blank.
pub fn post_form(title: &str, content: &str, category: &str) -> Result<MultipartForm, &'static str> {
    let title = required(title, "A post needs a title and some content.")?;
    let content = required(content, "A post needs a title and some content.")?;
    let form = MultipartForm::new()
        .text("title", title)
        .text("content", content);
    Ok(match category.trim() {
        "" => form,
        category => form.text("category", category),
    })
}

fn text_field(record: &Value, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

/// Home feed. Also mounted for `/categories/:category`; `?q=` turns it into
/// search results.
#[component]
pub fn UserPage() -> impl IntoView {
    let params = use_params_map();
    let query = use_query_map();
    let feed = RwSignal::new(None::<Result<Value, String>>);

    #[cfg(feature = "csr")]
    {
        let client = expect_context::<crate::net::ApiClient>();
        Effect::new(move || {
            let source = feed_source(params.get().get("category"), query.get().get("q"));
            let client = client.clone();
            super::load_into(feed, async move {
                match source {
                    FeedSource::All => client.get_posts().await,
                    FeedSource::Category(category) => client.get_posts_by_category(&category).await,
                    FeedSource::Search(q) => client.search(&q).await,
                }
            });
        });
    }

    let heading = move || match feed_source(params.get().get("category"), query.get().get("q")) {
        FeedSource::All => "Latest posts".to_owned(),
        FeedSource::Category(category) => format!("Posts in {category}"),
        FeedSource::Search(q) => format!("Results for \u{201c}{q}\u{201d}"),
    };

    let posts = move || match feed.get() {
        Some(Ok(body)) => items(&body, "posts"),
        _ => Vec::new(),
    };

    view! {
        <NavBar/>
        <main class="feed">
            <h1>{heading}</h1>
            <Show
                when=move || matches!(feed.get(), Some(Ok(_)))
                fallback=move || view! { <PayloadView data=feed/> }
            >
                {move || {
                    posts()
                        .into_iter()
                        .map(|post| view! { <PostCard post=post/> })
                        .collect_view()
                }}
            </Show>
        </main>
    }
}

/// One post in the feed with like and comment actions.
#[component]
pub fn PostCard(post: Value) -> impl IntoView {
    let id = record_id(&post).unwrap_or_default();
    let title = text_field(&post, "title");
    let content = text_field(&post, "content");
    let comment = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());

    #[cfg(feature = "csr")]
    let client = expect_context::<crate::net::ApiClient>();

    let like_id = id.clone();
    #[cfg(feature = "csr")]
    let like_client = client.clone();
    let on_like = move |_: leptos::ev::MouseEvent| {
        #[cfg(feature = "csr")]
        {
            let client = like_client.clone();
            let post_id = like_id.clone();
            leptos::task::spawn_local(async move {
                match client.toggle_like(&post_id).await {
                    Ok(_) => info.set("Like updated.".to_owned()),
                    Err(err) => info.set(super::failure_text("Like", &err)),
                }
            });
        }
        #[cfg(not(feature = "csr"))]
        log::trace!("like ignored outside the browser: {like_id}");
    };

    let comment_id = id.clone();
    let on_comment = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let text = match required(&comment.get(), "Write something first.") {
            Ok(text) => text,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        #[cfg(feature = "csr")]
        {
            let client = client.clone();
            let post_id = comment_id.clone();
            leptos::task::spawn_local(async move {
                match client.add_comment(&post_id, &text).await {
                    Ok(_) => {
                        comment.set(String::new());
                        info.set("Comment added.".to_owned());
                    }
                    Err(err) => info.set(super::failure_text("Comment", &err)),
                }
            });
        }
        #[cfg(not(feature = "csr"))]
        log::trace!("comment on {comment_id} ignored outside the browser: {text}");
    };

    view! {
        <article class="post-card">
            <h2>{title}</h2>
            <p>{content}</p>
            <div class="post-card__actions">
                <button on:click=on_like>"Like"</button>
                <A href=format!("/post/edit/{id}")>"Edit"</A>
            </div>
            <form class="post-card__comment" on:submit=on_comment>
                <input
                    type="text"
                    placeholder="Add a comment"
                    prop:value=move || comment.get()
                    on:input=move |ev| comment.set(event_target_value(&ev))
                />
                <button type="submit">"Comment"</button>
            </form>
            <Show when=move || !info.get().is_empty()>
                <p class="post-card__info">{move || info.get()}</p>
            </Show>
        </article>
    }
}

#[component]
pub fn CategoriesPage() -> impl IntoView {
    let posts = RwSignal::new(None::<Result<Value, String>>);

    #[cfg(feature = "csr")]
    {
        let client = expect_context::<crate::net::ApiClient>();
        super::load_into(posts, async move { client.get_posts().await });
    }

    let categories = move || match posts.get() {
        Some(Ok(body)) => categories_from_posts(&body),
        _ => Vec::new(),
    };

    view! {
        <NavBar/>
        <main class="categories">
            <h1>"Categories"</h1>
            <Show
                when=move || matches!(posts.get(), Some(Ok(_)))
                fallback=move || view! { <PayloadView data=posts/> }
            >
                <ul>
                    {move || {
                        categories()
                            .into_iter()
                            .map(|category| {
                                view! {
                                    <li>
                                        <A href=format!("/categories/{category}")>{category.clone()}</A>
                                    </li>
                                }
                            })
                            .collect_view()
                    }}
                </ul>
            </Show>
        </main>
    }
}

/// Shared title/content/category/media form used by create and edit.
#[component]
fn PostEditor(
    title: RwSignal<String>,
    content: RwSignal<String>,
    category: RwSignal<String>,
    media: NodeRef<leptos::html::Input>,
) -> impl IntoView {
    view! {
        <input
            type="text"
            placeholder="Title"
            prop:value=move || title.get()
            on:input=move |ev| title.set(event_target_value(&ev))
        />
        <textarea
            placeholder="What's on your mind?"
            prop:value=move || content.get()
            on:input=move |ev| content.set(event_target_value(&ev))
        ></textarea>
        <input
            type="text"
            placeholder="Category"
            prop:value=move || category.get()
            on:input=move |ev| category.set(event_target_value(&ev))
        />
        <input type="file" accept="image/*,video/*" node_ref=media/>
    }
}

#[component]
pub fn CreatePostPage() -> impl IntoView {
    let title = RwSignal::new(String::new());
    let content = RwSignal::new(String::new());
    let category = RwSignal::new(String::new());
    let media = NodeRef::<leptos::html::Input>::new();
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    #[cfg(feature = "csr")]
    let client = expect_context::<crate::net::ApiClient>();
    #[cfg(feature = "csr")]
    let navigate = leptos_router::hooks::use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let form = match post_form(&title.get(), &content.get(), &category.get()) {
            Ok(form) => form,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);

        #[cfg(feature = "csr")]
        {
            let client = client.clone();
            let navigate = navigate.clone();
            let picked = media.get_untracked();
            leptos::task::spawn_local(async move {
                let outcome = match super::attach_picked_file(form, "media", picked).await {
                    Ok(form) => client
                        .create_post(form)
                        .await
                        .map_err(|err| super::failure_text("Publishing", &err)),
                    Err(message) => Err(message),
                };
                match outcome {
                    Ok(_) => navigate(crate::router::HOME_PATH, leptos_router::NavigateOptions::default()),
                    Err(message) => info.set(message),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            log::trace!("create post ignored outside the browser: {} parts", form.parts().len());
            busy.set(false);
        }
    };

    view! {
        <NavBar/>
        <main class="post-editor">
            <h1>"New post"</h1>
            <form on:submit=on_submit>
                <PostEditor title=title content=content category=category media=media/>
                <button type="submit" disabled=move || busy.get()>"Publish"</button>
            </form>
            <Show when=move || !info.get().is_empty()>
                <p class="post-editor__info">{move || info.get()}</p>
            </Show>
        </main>
    }
}

#[component]
pub fn EditPostPage() -> impl IntoView {
    let params = use_params_map();
    let post_id = move || params.get_untracked().get("id").unwrap_or_default();
    let title = RwSignal::new(String::new());
    let content = RwSignal::new(String::new());
    let category = RwSignal::new(String::new());
    let media = NodeRef::<leptos::html::Input>::new();
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    #[cfg(feature = "csr")]
    let client = expect_context::<crate::net::ApiClient>();
    #[cfg(feature = "csr")]
    let navigate = leptos_router::hooks::use_navigate();

    #[cfg(feature = "csr")]
    {
        let client = client.clone();
        let id = post_id();
        leptos::task::spawn_local(async move {
            match client.get_post(&id).await {
                Ok(body) => {
                    let post = body.get("post").cloned().unwrap_or(body);
                    title.set(text_field(&post, "title"));
                    content.set(text_field(&post, "content"));
                    category.set(text_field(&post, "category"));
                }
                Err(err) => info.set(super::failure_text("Loading post", &err)),
            }
        });
    }

    #[cfg(feature = "csr")]
    let delete_client = client.clone();
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let form = match post_form(&title.get(), &content.get(), &category.get()) {
            Ok(form) => form,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);

        #[cfg(feature = "csr")]
        {
            let client = client.clone();
            let picked = media.get_untracked();
            let id = post_id();
            leptos::task::spawn_local(async move {
                let outcome = match super::attach_picked_file(form, "media", picked).await {
                    Ok(form) => client
                        .update_post(&id, form)
                        .await
                        .map_err(|err| super::failure_text("Saving", &err)),
                    Err(message) => Err(message),
                };
                match outcome {
                    Ok(_) => info.set("Saved.".to_owned()),
                    Err(message) => info.set(message),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            log::trace!("edit post {} ignored outside the browser: {} parts", post_id(), form.parts().len());
            busy.set(false);
        }
    };

    let on_delete = move |_: leptos::ev::MouseEvent| {
        #[cfg(feature = "csr")]
        {
            let client = delete_client.clone();
            let navigate = navigate.clone();
            let id = post_id();
            leptos::task::spawn_local(async move {
                match client.delete_post(&id).await {
                    Ok(_) => navigate(crate::router::HOME_PATH, leptos_router::NavigateOptions::default()),
                    Err(err) => info.set(super::failure_text("Deleting", &err)),
                }
            });
        }
        #[cfg(not(feature = "csr"))]
        log::trace!("delete post {} ignored outside the browser", post_id());
    };

    view! {
        <NavBar/>
        <main class="post-editor">
            <h1>"Edit post"</h1>
            <form on:submit=on_submit>
                <PostEditor title=title content=content category=category media=media/>
                <button type="submit" disabled=move || busy.get()>"Save"</button>
            </form>
            <button class="post-editor__delete" on:click=on_delete>"Delete post"</button>
            <Show when=move || !info.get().is_empty()>
                <p class="post-editor__info">{move || info.get()}</p>
            </Show>
        </main>
    }
}
