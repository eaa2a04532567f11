//! Route guarding: which view renders for a path given the stored session.

use crate::store::{ClientSession, SessionRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Login,
    About,
    Contact,
    ResumeBuilder,
    MockInterview,
    CareerRoadmap,
    JobMarket,
    ResumeAnalyzer,
    ChatBot,
    NotFound,
}

impl View {
    pub fn from_path(path: &str) -> View {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" | "/home" => View::Home,
            "/login" => View::Login,
            "/about" => View::About,
            "/contact" => View::Contact,
            "/resume-builder" => View::ResumeBuilder,
            "/mock-interview" => View::MockInterview,
            "/career-roadmap" => View::CareerRoadmap,
            "/job-market" => View::JobMarket,
            "/resume-analyze" => View::ResumeAnalyzer,
            "/chatbot" => View::ChatBot,
            _ => View::NotFound,
        }
    }

    pub fn requires_session(self) -> bool {
        !matches!(
            self,
            View::Login | View::About | View::Contact | View::NotFound
        )
    }
}

/// Protected views render only with a stored credential; otherwise the login
/// view renders in their place.
pub fn resolve_view<R: SessionRepository>(path: &str, session: &ClientSession<R>) -> View {
    let requested = View::from_path(path);
    if requested.requires_session() && !session.is_authenticated() {
        return View::Login;
    }
    requested
}
