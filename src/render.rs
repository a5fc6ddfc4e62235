use maud::{html, Markup, DOCTYPE};

use crate::model::{Post, User};

/// Shared page chrome: nav reflecting the login state, plus any pending
/// flash notice. All dynamic content is escaped by maud.
fn layout(title: &str, user: Option<&User>, notice: Option<&str>, body: Markup) -> Markup {
	html! {
		(DOCTYPE)
		html lang="en" {
			head {
				meta charset="utf-8";
				title { (title) }
			}
			body {
				nav {
					a href="/" { "Home" }
					@if let Some(user) = user {
						" "
						a href="/new" { "New post" }
						" "
						a href="/logout" { "Log out (" (user.username) ")" }
					} @else {
						" "
						a href="/login" { "Log in" }
						" "
						a href="/register" { "Register" }
					}
				}
				@if let Some(notice) = notice {
					p.notice { (notice) }
				}
				main { (body) }
			}
		}
	}
}

pub fn index(posts: &[Post], user: Option<&User>, notice: Option<&str>) -> Markup {
	layout(
		"Posts",
		user,
		notice,
		html! {
			h1 { "Posts" }
			ul {
				@for post in posts {
					li {
						a href={ "/post/" (post.id) } { (post.title) }
						" by " (post.author)
					}
				}
			}
		},
	)
}

pub fn post_detail(post: &Post, user: Option<&User>, notice: Option<&str>) -> Markup {
	let owned = user.is_some() && post.user_id == user.map(|user| user.id);

	layout(
		&post.title,
		user,
		notice,
		html! {
			h1 { (post.title) }
			p.author { "by " (post.author) }
			p { (post.content) }
			@if owned {
				a href={ "/edit/" (post.id) } { "Edit" }
				form method="post" action={ "/delete/" (post.id) } {
					button type="submit" { "Delete" }
				}
			}
		},
	)
}

/// Shared by the new-post and edit-post pages; `post` prefills the fields.
pub fn post_form(action: &str, post: Option<&Post>, user: Option<&User>, notice: Option<&str>) -> Markup {
	layout(
		if post.is_some() { "Edit post" } else { "New post" },
		user,
		notice,
		html! {
			form method="post" action=(action) {
				label { "Title"
					input type="text" name="title" value=[post.map(|post| &post.title)];
				}
				label { "Author"
					input type="text" name="author" value=[post.map(|post| &post.author)];
				}
				label { "Content"
					textarea name="content" {
						@if let Some(post) = post { (post.content) }
					}
				}
				button type="submit" { "Save" }
			}
		},
	)
}

pub fn login(user: Option<&User>, notice: Option<&str>) -> Markup {
	layout(
		"Log in",
		user,
		notice,
		html! {
			form method="post" action="/login" {
				label { "Username"
					input type="text" name="username";
				}
				label { "Password"
					input type="password" name="password";
				}
				button type="submit" { "Log in" }
			}
		},
	)
}

pub fn register(user: Option<&User>, notice: Option<&str>) -> Markup {
	layout(
		"Register",
		user,
		notice,
		html! {
			form method="post" action="/register" {
				label { "Username"
					input type="text" name="username";
				}
				label { "Password"
					input type="password" name="password";
				}
				button type="submit" { "Register" }
			}
		},
	)
}

#[cfg(test)]
mod test {
	use crate::model::Post;

	#[test]
	fn index_escapes_post_titles() {
		let posts = vec![Post {
			id: 1,
			title: "<script>".into(),
			author: "A".into(),
			content: "C".into(),
			user_id: None,
		}];

		let markup = super::index(&posts, None, None).into_string();

		assert!(markup.contains("&lt;script&gt;"));
		assert!(!markup.contains("<script>"));
	}
}
