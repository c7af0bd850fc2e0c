use askama::Template;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::catalog::{self, Album, ClassInfo, ClassStructure, HomeroomTeacher, ALBUMS};
use crate::db::models::User;
use crate::error::AppResult;
use crate::services::students::list_students;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub class: &'static ClassInfo,
    pub teacher: &'static HomeroomTeacher,
    pub structure: &'static ClassStructure,
    pub albums: &'static [Album],
}

#[derive(Template)]
#[template(path = "pages/album.html")]
pub struct AlbumTemplate {
    pub class: &'static ClassInfo,
    pub album: &'static Album,
}

#[derive(Template)]
#[template(path = "pages/students.html")]
pub struct StudentsTemplate {
    pub class: &'static ClassInfo,
    pub students: Vec<User>,
}

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

fn home_page() -> Html<HomeTemplate> {
    Html(HomeTemplate {
        class: &catalog::CLASS,
        teacher: &catalog::TEACHER,
        structure: &catalog::STRUCTURE,
        albums: ALBUMS,
    })
}

pub async fn index() -> Html<HomeTemplate> {
    home_page()
}

/// Album page; an unknown album falls back to the home page.
pub async fn album(Path(key): Path<String>) -> Response {
    match catalog::album(&key) {
        Some(album) => Html(AlbumTemplate {
            class: &catalog::CLASS,
            album,
        })
        .into_response(),
        None => {
            tracing::debug!("Unknown album {:?}, showing home page", key);
            home_page().into_response()
        }
    }
}

pub async fn students(State(state): State<AppState>) -> AppResult<Html<StudentsTemplate>> {
    let students = list_students(&state.db)?;
    Ok(Html(StudentsTemplate {
        class: &catalog::CLASS,
        students,
    }))
}
