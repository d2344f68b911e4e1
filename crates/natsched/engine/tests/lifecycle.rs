//! End-to-end lifecycle scenarios against the in-memory network.

use natsched_engine::{Dispatcher, LifecycleError, ScheduleConfig};
use natsched_provider::{InMemoryNetwork, Mutation, NetworkProvider};
use natsched_types::{
    GatewayId, GatewayState, InvocationEvent, Operation, RouteTableId, SubnetId,
};
use std::sync::Arc;

fn config() -> ScheduleConfig {
    ScheduleConfig::new(
        SubnetId::new("subnet-pub"),
        vec![SubnetId::new("subnet-a"), SubnetId::new("subnet-b")],
    )
}

async fn network_with_tables() -> Arc<InMemoryNetwork> {
    let network = Arc::new(InMemoryNetwork::new());
    network.seed_route_table("rtb-a", "subnet-a", vec![]).await;
    network.seed_route_table("rtb-b", "subnet-b", vec![]).await;
    network
}

fn gateway_of(response_body: &str) -> GatewayId {
    let id = response_body
        .rsplit(' ')
        .next()
        .expect("response names a gateway");
    GatewayId::new(id)
}

#[tokio::test]
async fn create_from_empty_state_allocates_routes_everything() {
    let network = network_with_tables().await;
    let dispatcher = Dispatcher::new(network.clone(), config()).unwrap();

    let response = dispatcher
        .handle(InvocationEvent {
            operation: Operation::Create,
        })
        .await
        .unwrap();

    assert_eq!(response.status_code, 200);
    let gateway_id = gateway_of(&response.body);

    // One address allocated, one gateway created, awaited to available.
    assert_eq!(network.address_count().await, 1);
    assert_eq!(
        network.gateway_state(&gateway_id).await.unwrap(),
        GatewayState::Available
    );

    // Both private route tables gained a default route to the gateway.
    for table_id in ["rtb-a", "rtb-b"] {
        let table = network
            .route_table(&RouteTableId::new(table_id))
            .await
            .unwrap();
        let route = table.default_route().expect("default route created");
        assert_eq!(route.gateway_id.as_ref(), Some(&gateway_id));
    }

    assert_eq!(
        network.mutations().await,
        vec![
            Mutation::AllocateAddress,
            Mutation::CreateGateway,
            Mutation::CreateRoute(RouteTableId::new("rtb-a")),
            Mutation::CreateRoute(RouteTableId::new("rtb-b")),
        ]
    );
}

#[tokio::test]
async fn create_is_idempotent_at_the_route_layer() {
    let network = network_with_tables().await;
    let dispatcher = Dispatcher::new(network.clone(), config()).unwrap();

    dispatcher.run(Operation::Create).await.unwrap();

    // A second create builds a second gateway (tolerated, logged) but the
    // route convergence against the same tables replaces, never duplicates.
    network.clear_mutations().await;
    dispatcher.run(Operation::Create).await.unwrap();

    for table_id in ["rtb-a", "rtb-b"] {
        let table = network
            .route_table(&RouteTableId::new(table_id))
            .await
            .unwrap();
        let defaults = table.routes.iter().filter(|r| r.is_default()).count();
        assert_eq!(defaults, 1);
    }
}

#[tokio::test]
async fn delete_after_create_removes_routes_and_retains_address() {
    let network = network_with_tables().await;
    let dispatcher = Dispatcher::new(network.clone(), config()).unwrap();

    let created = dispatcher.run(Operation::Create).await.unwrap();
    let gateway_id = gateway_of(&created.body);

    network.clear_mutations().await;
    let deleted = dispatcher.run(Operation::Delete).await.unwrap();
    assert_eq!(gateway_of(&deleted.body), gateway_id);

    // Gateway is gone; the address is retained for the next cycle.
    assert_eq!(
        network.gateway_state(&gateway_id).await.unwrap(),
        GatewayState::Deleted
    );
    assert_eq!(network.address_count().await, 1);

    // Both default routes were removed.
    for table_id in ["rtb-a", "rtb-b"] {
        let table = network
            .route_table(&RouteTableId::new(table_id))
            .await
            .unwrap();
        assert!(table.default_route().is_none());
    }

    assert_eq!(
        network.mutations().await,
        vec![
            Mutation::DeleteGateway,
            Mutation::DeleteRoute(RouteTableId::new("rtb-a")),
            Mutation::DeleteRoute(RouteTableId::new("rtb-b")),
        ]
    );
}

#[tokio::test]
async fn second_delete_fails_with_not_found() {
    let network = network_with_tables().await;
    let dispatcher = Dispatcher::new(network.clone(), config()).unwrap();

    dispatcher.run(Operation::Create).await.unwrap();
    dispatcher.run(Operation::Delete).await.unwrap();

    network.clear_mutations().await;
    let err = dispatcher.run(Operation::Delete).await.unwrap_err();

    assert!(matches!(err.source, LifecycleError::NotFound { .. }));
    assert_eq!(err.operation, Operation::Delete);
    assert_eq!(network.mutation_count().await, 0);
}

#[tokio::test]
async fn full_cycle_reuses_the_retained_address() {
    let network = network_with_tables().await;
    let dispatcher = Dispatcher::new(network.clone(), config()).unwrap();

    dispatcher.run(Operation::Create).await.unwrap();
    dispatcher.run(Operation::Delete).await.unwrap();

    // The next cycle's create must reuse the retained address.
    network.clear_mutations().await;
    dispatcher.run(Operation::Create).await.unwrap();

    assert_eq!(network.address_count().await, 1);
    assert!(!network
        .mutations()
        .await
        .contains(&Mutation::AllocateAddress));
}
