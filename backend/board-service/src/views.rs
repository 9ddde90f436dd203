//! HTML rendering for the list page.

use crate::models::PostView;
use minijinja::{context, Environment};

const POSTS_TEMPLATE_NAME: &str = "posts.html";
const POSTS_TEMPLATE: &str = include_str!("../templates/posts.html");

/// Template environment, built once at startup
pub struct BoardView {
    env: Environment<'static>,
}

impl BoardView {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(POSTS_TEMPLATE_NAME, POSTS_TEMPLATE)?;
        Ok(Self { env })
    }

    /// Render the list page for `user`. Output is HTML-escaped.
    pub fn render_posts(&self, user: &str, posts: &[PostView]) -> Result<String, minijinja::Error> {
        let template = self.env.get_template(POSTS_TEMPLATE_NAME)?;
        template.render(context! {
            user => user,
            posts => posts,
        })
    }
}
