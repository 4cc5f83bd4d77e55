use serde::Serialize;

use super::ROUTES;
use crate::{
    request::method::Method,
    response::{Response, OK},
};

pub const WELCOME_MESSAGE: &str = "Welcome to the Happy Thoughts API!";

#[derive(Serialize, Debug, PartialEq)]
pub struct Endpoint {
    pub path: &'static str,
    pub methods: Vec<Method>,
}

#[derive(Serialize, Debug)]
pub struct Welcome {
    pub message: &'static str,
    pub endpoints: Vec<Endpoint>,
}

/// Groups [`ROUTES`] by path, keeping first-registration order.
pub fn endpoints() -> Vec<Endpoint> {
    let mut endpoints: Vec<Endpoint> = Vec::with_capacity(ROUTES.len());
    for &(method, path) in ROUTES {
        match endpoints.iter_mut().find(|e| e.path == path) {
            Some(endpoint) => endpoint.methods.push(method),
            None => endpoints.push(Endpoint {
                path,
                methods: vec![method],
            }),
        }
    }
    endpoints
}

pub(crate) fn handle_root() -> Response {
    Response::json(
        OK,
        &Welcome {
            message: WELCOME_MESSAGE,
            endpoints: endpoints(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_methods_by_path() {
        assert_eq!(
            endpoints(),
            vec![
                Endpoint {
                    path: "/",
                    methods: vec![Method::Get]
                },
                Endpoint {
                    path: "/thoughts",
                    methods: vec![Method::Get, Method::Post]
                },
                Endpoint {
                    path: "/thoughts/:id/like",
                    methods: vec![Method::Post]
                },
            ]
        );
    }

    #[test]
    fn welcome_body_lists_endpoints() {
        let response = handle_root();
        let body: serde_json::Value =
            serde_json::from_str(response.content().unwrap()).unwrap();
        assert_eq!(body["message"], WELCOME_MESSAGE);
        assert_eq!(body["endpoints"][1]["path"], "/thoughts");
        assert_eq!(body["endpoints"][1]["methods"], serde_json::json!(["GET", "POST"]));
    }
}
