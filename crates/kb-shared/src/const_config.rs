//! Stores settings that are not expected to need to change but grouped together
//! for discoverability and reuse. Each constant should be prefixed by the module
//! name to allow importing the constant only and still be readable

pub mod client {
    use std::time::Duration;

    /// Used when no server address is configured
    pub const CLIENT_DEFAULT_SERVER_ADDRESS: &str = "http://127.0.0.1:8000";
    pub const CLIENT_REQUEST_TIMEOUT: Duration = Duration::from_millis(15_000);
}

pub mod storage {
    /// JSON serialized [`crate::uac::UserIdentity`]
    pub const STORAGE_KEY_USER_INFO: &str = "userInfo";
    /// Opaque bearer credential, stored independently of the user info
    pub const STORAGE_KEY_TOKEN: &str = "token";
}

pub mod route {
    pub const ROUTE_ROOT: &str = "/";
    pub const ROUTE_HOME: &str = "/home";
    pub const ROUTE_CHAT: &str = "/chat";
    pub const ROUTE_KNOWLEDGE: &str = "/knowledge";
    pub const ROUTE_LOGIN: &str = "/login";
    pub const ROUTE_USER_MANAGE: &str = "/user-manage";
}

pub mod path {
    mod path_spec;
    use std::fmt::Display;

    pub use path_spec::PathSpec;
    use reqwest::Method;

    pub const PATH_API_CHAT_ADD_MESSAGE: PathSpec = PathSpec::post("/api/chat/add_message/");
    pub const PATH_API_CHAT_CLEAR_HISTORY: PathSpec = PathSpec::post("/api/chat/clear_history/");
    pub const PATH_API_CHAT_CREATE_SESSION: PathSpec =
        PathSpec::post("/api/chat/create_session/");
    pub const PATH_API_CHAT_HISTORY: PathSpec = PathSpec::get("/api/chat/get_history/");
    pub const PATH_API_CHAT_SAVE_SYMPTOMS: PathSpec = PathSpec::post("/api/chat/save_symptoms/");
    pub const PATH_API_CHAT_SESSION_LIST: PathSpec = PathSpec::get("/api/chat/get_session_list/");
    pub const PATH_API_CHAT_STREAM: PathSpec = PathSpec::get("/api/chat/stream_chat/");
    pub const PATH_API_CHAT_SYMPTOMS: PathSpec = PathSpec::get("/api/chat/get_symptoms/");
    pub const PATH_API_KNOWLEDGE_DISEASE_SUBGRAPH: PathSpec =
        PathSpec::get("/api/knowledge/get_disease_subgraph/");
    pub const PATH_API_KNOWLEDGE_GRAPH: PathSpec = PathSpec::get("/api/knowledge/graph/");
    pub const PATH_API_KNOWLEDGE_NODE_DETAILS: PathSpec =
        PathSpec::get("/api/knowledge/node_details/");
    pub const PATH_API_KNOWLEDGE_NODE_SUBGRAPH: PathSpec =
        PathSpec::get("/api/knowledge/get_node_subgraph/");
    pub const PATH_API_KNOWLEDGE_RELATED_NODES: PathSpec =
        PathSpec::get("/api/knowledge/related_nodes/");
    pub const PATH_API_USERS_LIST: PathSpec = PathSpec::get(PATH_API_USERS_PREFIX);
    pub const PATH_API_USERS_LOGIN: PathSpec = PathSpec::post("/api/users/login/");
    pub const PATH_API_USERS_LOGOUT: PathSpec = PathSpec::post("/api/users/logout/");
    pub const PATH_API_USERS_PREFIX: &str = "/api/users/";
    pub const PATH_API_USERS_REGISTER: PathSpec = PathSpec::post("/api/users/register/");
    pub const PATH_API_USERS_VERIFY_TOKEN: PathSpec = PathSpec::get("/api/users/verify_token/");

    pub fn path_api_user<I: Display>(id: I) -> PathSpec {
        PathSpec::detail(Method::GET, PATH_API_USERS_PREFIX, id, None)
    }

    pub fn path_api_user_delete<I: Display>(id: I) -> PathSpec {
        PathSpec::detail(Method::DELETE, PATH_API_USERS_PREFIX, id, None)
    }

    pub fn path_api_user_disable<I: Display>(id: I) -> PathSpec {
        PathSpec::detail(Method::POST, PATH_API_USERS_PREFIX, id, Some("disable_account"))
    }

    pub fn path_api_user_enable<I: Display>(id: I) -> PathSpec {
        PathSpec::detail(Method::POST, PATH_API_USERS_PREFIX, id, Some("enable_account"))
    }
}

#[cfg(test)]
mod tests {
    use super::path::*;
    use super::route::*;
    use rstest::rstest;

    #[rstest]
    #[case(ROUTE_HOME)]
    #[case(ROUTE_CHAT)]
    #[case(ROUTE_KNOWLEDGE)]
    #[case(ROUTE_LOGIN)]
    #[case(ROUTE_USER_MANAGE)]
    fn routes_are_absolute(#[case] route: &str) {
        assert!(route.starts_with('/'));
        assert_ne!(route, ROUTE_ROOT);
    }

    #[test]
    fn user_paths_share_prefix() {
        assert_eq!(path_api_user(3).path, "/api/users/3/");
        assert_eq!(path_api_user_enable(3).path, "/api/users/3/enable_account/");
        assert_eq!(PATH_API_USERS_LIST.path, PATH_API_USERS_PREFIX);
    }
}
