//! HTML page rendering
//!
//! Pure functions from structured data to HTML strings. All
//! interpolated values are escaped here, at the last moment before
//! they hit markup.

use html_escape::encode_text;

use crate::github::{ActivityEntry, ContributorSummary, RepoSummary, UserSummary};

/// Wrap page content in the shared document shell
pub fn styled_page(content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <style>
    body {{
      font-family: 'Arial', sans-serif;
      text-align: center;
      margin: 20px;
    }}
    h1, h2 {{
      color: #0366d6;
    }}
    ul {{
      list-style-type: none;
      padding: 0;
    }}
    li {{
      border: 1px solid #ddd;
      margin: 5px;
      padding: 10px;
      border-radius: 5px;
    }}
  </style>
</head>
<body>
{content}
</body>
</html>
"#
    )
}

/// Error page body used by `AppError::into_response`
pub fn error_page(message: &str) -> String {
    styled_page(&format!("<h2>Error: {}</h2>", encode_text(message)))
}

/// Home page: welcome plus the username lookup form
pub fn home_page(logged_in_as: Option<&str>) -> String {
    let account_links = match logged_in_as {
        Some(username) => format!(
            r#"<p>Signed in as <strong>{}</strong> &middot; <a href="/dashboard">Dashboard</a> &middot; <a href="/logout">Log out</a></p>"#,
            encode_text(username)
        ),
        None => r#"<p><a href="/login">Log in</a> &middot; <a href="/signup">Sign up</a> &middot; <a href="/auth/google">Sign in with Google</a></p>"#
            .to_string(),
    };

    styled_page(&format!(
        r#"<h1>Welcome to the GitHub User Info App!</h1>
{account_links}
<form action="/github/users" method="GET">
  <label for="usernames">Enter GitHub usernames (comma-separated):</label>
  <input type="text" id="usernames" name="usernames" required>
  <button type="submit">Get Info</button>
</form>"#
    ))
}

/// User summary list page
pub fn users_page(users: &[UserSummary]) -> String {
    let items: String = users
        .iter()
        .map(|user| {
            let name = user.name.as_deref().unwrap_or("(no name)");
            format!(
                "<li><strong>{}</strong><p>Followers: {}</p><p>Following: {}</p></li>",
                encode_text(name),
                user.followers,
                user.following
            )
        })
        .collect();

    styled_page(&format!(
        "<h1>GitHub User Information</h1>\n<ul>{items}</ul>"
    ))
}

/// Repository list page
pub fn repos_page(username: &str, repos: &[RepoSummary]) -> String {
    let items: String = repos
        .iter()
        .map(|repo| {
            let description = repo
                .description
                .as_deref()
                .unwrap_or("No description available.");
            format!(
                "<li><strong>{}</strong><p>Description: {}</p><p>Stars: {}</p><p>Forks: {}</p></li>",
                encode_text(&repo.name),
                encode_text(description),
                repo.stars,
                repo.forks
            )
        })
        .collect();

    styled_page(&format!(
        "<h1>GitHub Repositories for {}</h1>\n<ul>{items}</ul>",
        encode_text(username)
    ))
}

/// Contributor list page
pub fn contributors_page(contributors: &[ContributorSummary]) -> String {
    let items: String = contributors
        .iter()
        .map(|contributor| {
            format!(
                "<li><strong>{}</strong><p>Contributions: {}</p></li>",
                encode_text(&contributor.username),
                contributor.contributions
            )
        })
        .collect();

    styled_page(&format!(
        "<h1>GitHub Repository Contributors</h1>\n<ul>{items}</ul>"
    ))
}

/// Dashboard: the signed-in user's recent activity
pub fn dashboard_page(username: &str, entries: &[ActivityEntry]) -> String {
    let items: String = if entries.is_empty() {
        "<li>No recent public activity.</li>".to_string()
    } else {
        entries
            .iter()
            .map(|entry| {
                format!(
                    "<li><strong>{}</strong><p>{}</p><p>{}</p></li>",
                    encode_text(&entry.kind),
                    encode_text(&entry.repo),
                    encode_text(&entry.title)
                )
            })
            .collect()
    };

    styled_page(&format!(
        "<h1>Recent Activity for {}</h1>\n<ul>{items}</ul>",
        encode_text(username)
    ))
}

/// Signup form, optionally with an inline error message
pub fn signup_page(error: Option<&str>) -> String {
    styled_page(&format!(
        r#"<h1>Sign Up</h1>
{error}
<form action="/signup" method="POST">
  <p><label for="username">Username:</label> <input type="text" id="username" name="username" required></p>
  <p><label for="password">Password:</label> <input type="password" id="password" name="password" required></p>
  <button type="submit">Sign Up</button>
</form>
<p>Already have an account? <a href="/login">Log in</a></p>"#,
        error = inline_error(error)
    ))
}

/// Login form
pub fn login_page() -> String {
    styled_page(
        r#"<h1>Log In</h1>
<form action="/login" method="POST">
  <p><label for="username">Username:</label> <input type="text" id="username" name="username" required></p>
  <p><label for="password">Password:</label> <input type="password" id="password" name="password" required></p>
  <button type="submit">Log In</button>
</form>
<p><a href="/auth/google">Sign in with Google</a></p>
<p>New here? <a href="/signup">Sign up</a></p>"#,
    )
}

fn inline_error(error: Option<&str>) -> String {
    match error {
        Some(message) => format!("<h2>Error: {}</h2>", encode_text(message)),
        None => String::new(),
    }
}
