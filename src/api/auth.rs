//! Login flow and course enumeration.

use serde::Deserialize;

use crate::api::session::Session;
use crate::config::{AccountConfig, PortalConfig};
use crate::error::{Error, Result};
use crate::page::portal::COURSE_LIST_TOOL;
use crate::page::{
    absolute_url, meta_refresh_target, parse_course_list, parse_identity, tool_link, Identity,
};
use crate::resource::Course;

/// Reply of the login endpoint.
#[derive(Debug, Deserialize)]
struct LoginReply {
    /// Whether the credentials were accepted.
    f: bool,
    /// Redirect URL on success, failure reason otherwise.
    msg: String,
}

/// Log in and establish the course-site session.
///
/// Returns the identity shown in the portal header.
pub async fn login(
    session: &dyn Session,
    portal: &PortalConfig,
    account: &AccountConfig,
) -> Result<Identity> {
    tracing::info!("Logging in as {}", account.username);

    // headers of the AJAX login form
    let origin = url::Url::parse(&portal.login_url)
        .map_err(|e| Error::Config(format!("Invalid login URL: {}", e)))?
        .origin()
        .ascii_serialization();
    let referer = format!("{}/", origin);

    let body = session
        .post_form_with_headers(
            &portal.login_url,
            &[
                ("username", account.username.as_str()),
                ("password", account.password.as_str()),
                ("remember", "checked"),
            ],
            &[
                ("X-Requested-With", "XMLHttpRequest"),
                ("Origin", origin.as_str()),
                ("Referer", referer.as_str()),
            ],
        )
        .await?;

    let reply: LoginReply = serde_json::from_str(&body).map_err(|e| {
        Error::Authentication(format!("Unexpected login response: {}", e))
    })?;

    if !reply.f {
        return Err(Error::Authentication(reply.msg));
    }

    let landing = session.get_text(&reply.msg, &[]).await?;
    let identity = parse_identity(&landing).ok_or_else(|| {
        Error::Authentication("Login was not accepted; check username and password".into())
    })?;

    tracing::info!("Logged in: {} {}", identity.institute, identity.name);

    session.get_text(&portal.app_store_url, &[]).await?;

    Ok(identity)
}

/// List the user's enrolled courses in portal order.
///
/// With `account.another_user` set, the course site is switched to that
/// identity before the course list is resolved.
pub async fn fetch_courses(
    session: &dyn Session,
    portal: &PortalConfig,
    account: &AccountConfig,
) -> Result<Vec<Course>> {
    let entry = session.get_text(&portal.entry_url, &[]).await?;
    let site_url = meta_refresh_target(&entry)
        .ok_or_else(|| Error::Navigation("Course site redirect not found".into()))?;
    let mut site_url = absolute_url(&portal.entry_url, &site_url);

    let mut site = session.get_text(&site_url, &[]).await?;

    if let Some(student_id) = account.another_user() {
        tracing::info!("Switching course site to user {}", student_id);
        site = session
            .get_text(&portal.course_portal_url, &[("anotherUser", student_id)])
            .await?;
        site_url = portal.course_portal_url.clone();
    }

    let list_url = tool_link(&site, COURSE_LIST_TOOL)
        .ok_or_else(|| Error::Navigation("Course list link not found".into()))?;
    let list_url = absolute_url(&site_url, &list_url);

    let list = session.get_text(&list_url, &[]).await?;
    let courses: Vec<Course> = parse_course_list(&list)
        .into_iter()
        .map(|course| Course::new(course.name, absolute_url(&list_url, &course.url)))
        .collect();

    tracing::info!("Found {} courses", courses.len());
    for course in &courses {
        tracing::debug!("Course: {} ({})", course.name, course.url);
    }

    Ok(courses)
}
