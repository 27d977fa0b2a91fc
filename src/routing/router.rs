//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store (method, template, handler) entries in declaration order
//! - Look up the first entry matching a request method and path
//! - Return the handler with its extracted parameters, or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc without locks)
//! - O(n) scan over routes (acceptable for small route tables)
//! - First match wins

use axum::http::Method;

use super::matcher::{PathParams, PathTemplate};

/// One entry of the route table.
#[derive(Debug, Clone)]
pub struct Route<H> {
    pub method: Method,
    pub template: PathTemplate,
    pub handler: H,
}

/// Result of a successful lookup.
#[derive(Debug)]
pub struct RouteMatch<'a, H> {
    pub route: &'a Route<H>,
    pub params: PathParams,
}

/// An ordered table of routes.
#[derive(Debug, Clone)]
pub struct RouteTable<H> {
    routes: Vec<Route<H>>,
}

impl<H> RouteTable<H> {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Append a route. Earlier routes take precedence.
    pub fn route(mut self, method: Method, template: &str, handler: H) -> Self {
        self.routes.push(Route {
            method,
            template: PathTemplate::new(template),
            handler,
        });
        self
    }

    /// Find the first route matching `method` and `path`.
    pub fn match_request(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, H>> {
        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| {
                route
                    .template
                    .match_path(path)
                    .map(|params| RouteMatch { route, params })
            })
    }

    /// All routes, in declaration order.
    pub fn routes(&self) -> &[Route<H>] {
        &self.routes
    }
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self::new()
    }
}
