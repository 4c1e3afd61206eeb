pub mod chat {
    use std::collections::BTreeMap;

    #[derive(Debug, serde::Serialize, Clone, PartialEq, Eq)]
    pub struct SessionListReqArgs {
        /// 1 based
        pub page: u32,
        pub size: u32,
    }

    impl Default for SessionListReqArgs {
        fn default() -> Self {
            Self { page: 1, size: 3 }
        }
    }

    #[derive(Debug, serde::Serialize, Clone, PartialEq, Eq)]
    pub struct SessionReqArgs {
        pub session_id: String,
    }

    #[derive(Debug, serde::Serialize, Clone, PartialEq, Eq)]
    pub struct AddMessageReqArgs {
        pub session_id: String,
        pub role: String,
        pub content: String,
    }

    #[derive(Debug, serde::Serialize, Clone, PartialEq)]
    pub struct SaveSymptomsReqArgs {
        pub session_id: String,
        pub symptoms: BTreeMap<String, serde_json::Value>,
    }

    /// The stream endpoint does not read the authorization header so the
    /// token travels as a query parameter
    #[derive(serde::Serialize, Clone)]
    pub struct StreamChatReqArgs {
        pub message: String,
        pub session_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub token: Option<String>,
    }

    impl std::fmt::Debug for StreamChatReqArgs {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("StreamChatReqArgs")
                .field("message", &self.message)
                .field("session_id", &self.session_id)
                .field("has_token", &self.token.is_some())
                .finish()
        }
    }
}

pub mod knowledge {
    #[derive(Debug, serde::Serialize, Clone, PartialEq, Eq)]
    pub struct NodeReqArgs {
        pub id: String,
    }

    #[derive(Debug, serde::Serialize, Clone, PartialEq, Eq)]
    pub struct RelatedNodesReqArgs {
        pub id: String,
        #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
        pub relation_type: Option<String>,
    }

    #[derive(Debug, serde::Serialize, Clone, PartialEq, Eq)]
    pub struct DiseaseSubgraphReqArgs {
        pub disease: String,
    }

    #[derive(Debug, serde::Serialize, Clone, PartialEq, Eq)]
    pub struct NodeSubgraphReqArgs {
        pub node: String,
        #[serde(rename = "type")]
        pub node_type: String,
    }
}
