use futures::channel::oneshot;
use kb_shared::{
    const_config::path::{
        PATH_API_KNOWLEDGE_DISEASE_SUBGRAPH, PATH_API_KNOWLEDGE_GRAPH,
        PATH_API_KNOWLEDGE_NODE_DETAILS, PATH_API_KNOWLEDGE_NODE_SUBGRAPH,
        PATH_API_KNOWLEDGE_RELATED_NODES,
    },
    knowledge::GraphData,
    req_args::api::knowledge::{
        DiseaseSubgraphReqArgs, NodeReqArgs, NodeSubgraphReqArgs, RelatedNodesReqArgs,
    },
};

use crate::{
    client::{UiCallBack, NO_ARGS},
    Client,
};

impl Client {
    #[tracing::instrument(skip(ui_notify))]
    pub fn graph<F: UiCallBack>(&self, ui_notify: F) -> oneshot::Receiver<anyhow::Result<GraphData>> {
        self.send_request_expect_json(&PATH_API_KNOWLEDGE_GRAPH, &NO_ARGS, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn node_details<F: UiCallBack>(
        &self,
        args: &NodeReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<GraphData>> {
        self.send_request_expect_json(&PATH_API_KNOWLEDGE_NODE_DETAILS, args, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn related_nodes<F: UiCallBack>(
        &self,
        args: &RelatedNodesReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<GraphData>> {
        self.send_request_expect_json(&PATH_API_KNOWLEDGE_RELATED_NODES, args, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn disease_subgraph<F: UiCallBack>(
        &self,
        args: &DiseaseSubgraphReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<GraphData>> {
        self.send_request_expect_json(&PATH_API_KNOWLEDGE_DISEASE_SUBGRAPH, args, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn node_subgraph<F: UiCallBack>(
        &self,
        args: &NodeSubgraphReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<GraphData>> {
        self.send_request_expect_json(&PATH_API_KNOWLEDGE_NODE_SUBGRAPH, args, ui_notify)
    }
}
