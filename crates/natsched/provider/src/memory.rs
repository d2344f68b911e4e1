//! In-memory network fake for tests and local rehearsal.
//!
//! Mirrors just enough provider behavior for the reconcilers: tag-filtered
//! queries, gateway state settling over successive polls, and route table
//! mutation. Every mutating call is recorded so tests can assert that a
//! steady-state run issues zero mutations.

use crate::error::{ProviderError, ProviderResult};
use crate::traits::NetworkProvider;
use async_trait::async_trait;
use chrono::Utc;
use natsched_types::{
    Address, AllocationId, Gateway, GatewayId, GatewayState, Route, RouteTable, RouteTableId,
    SubnetId,
};
use std::collections::HashSet;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A recorded mutating call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    AllocateAddress,
    CreateGateway,
    DeleteGateway,
    CreateRoute(RouteTableId),
    ReplaceRoute(RouteTableId),
    DeleteRoute(RouteTableId),
}

#[derive(Debug)]
struct GatewayRecord {
    gateway: Gateway,
    /// State queries remaining before a pending/deleting gateway settles.
    settle_in: usize,
}

#[derive(Debug, Default)]
struct NetworkState {
    addresses: Vec<Address>,
    gateways: Vec<GatewayRecord>,
    tables: Vec<RouteTable>,
    mutations: Vec<Mutation>,
    fail_allocation: bool,
    fail_gateway_creation: bool,
    fail_tables: HashSet<RouteTableId>,
    settle_polls: usize,
}

/// In-memory [`NetworkProvider`] implementation.
#[derive(Debug, Default)]
pub struct InMemoryNetwork {
    state: RwLock<NetworkState>,
}

impl InMemoryNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an address as if it had been allocated earlier.
    pub async fn seed_address(
        &self,
        allocation_id: &str,
        public_ip: &str,
        name_tag: &str,
        association_id: Option<&str>,
    ) {
        let mut state = self.state.write().await;
        state.addresses.push(Address {
            allocation_id: AllocationId::new(allocation_id),
            public_ip: public_ip.to_string(),
            association_id: association_id.map(str::to_string),
            name_tag: name_tag.to_string(),
            allocated_at: Utc::now(),
        });
    }

    /// Seed a gateway in a given state.
    pub async fn seed_gateway(
        &self,
        id: &str,
        subnet_id: &str,
        allocation_id: &str,
        gateway_state: GatewayState,
        name_tag: &str,
    ) {
        let mut state = self.state.write().await;
        let public_ip = state
            .addresses
            .iter()
            .find(|a| a.allocation_id.as_str() == allocation_id)
            .map(|a| a.public_ip.clone());
        state.gateways.push(GatewayRecord {
            gateway: Gateway {
                id: GatewayId::new(id),
                subnet_id: SubnetId::new(subnet_id),
                allocation_id: AllocationId::new(allocation_id),
                public_ip,
                state: gateway_state,
                name_tag: name_tag.to_string(),
                created_at: Utc::now(),
            },
            settle_in: 0,
        });
    }

    /// Seed a route table associated with a subnet.
    pub async fn seed_route_table(&self, id: &str, subnet_id: &str, routes: Vec<Route>) {
        let mut state = self.state.write().await;
        state.tables.push(RouteTable {
            id: RouteTableId::new(id),
            subnet_id: SubnetId::new(subnet_id),
            routes,
        });
    }

    /// Number of state queries a newly created or deleted gateway stays in
    /// its transitional state before settling. Zero means the first poll
    /// already observes the terminal state.
    pub async fn set_settle_polls(&self, polls: usize) {
        self.state.write().await.settle_polls = polls;
    }

    /// Make subsequent address allocations fail.
    pub async fn fail_allocations(&self) {
        self.state.write().await.fail_allocation = true;
    }

    /// Make subsequent gateway creations fail.
    pub async fn fail_gateway_creation(&self) {
        self.state.write().await.fail_gateway_creation = true;
    }

    /// Make route mutations on the given table fail.
    pub async fn fail_route_ops_on(&self, table_id: &RouteTableId) {
        self.state.write().await.fail_tables.insert(table_id.clone());
    }

    /// Pin a gateway to a specific state, bypassing settling.
    pub async fn force_gateway_state(&self, gateway_id: &GatewayId, new_state: GatewayState) {
        let mut state = self.state.write().await;
        if let Some(record) = state.gateways.iter_mut().find(|r| &r.gateway.id == gateway_id) {
            record.gateway.state = new_state;
            record.settle_in = 0;
        }
    }

    /// Mutating calls recorded since construction or the last clear.
    pub async fn mutations(&self) -> Vec<Mutation> {
        self.state.read().await.mutations.clone()
    }

    pub async fn mutation_count(&self) -> usize {
        self.state.read().await.mutations.len()
    }

    pub async fn clear_mutations(&self) {
        self.state.write().await.mutations.clear();
    }

    /// Current contents of a route table, for assertions.
    pub async fn route_table(&self, table_id: &RouteTableId) -> Option<RouteTable> {
        let state = self.state.read().await;
        state.tables.iter().find(|t| &t.id == table_id).cloned()
    }

    /// Current view of an address, for assertions.
    pub async fn address(&self, allocation_id: &AllocationId) -> Option<Address> {
        let state = self.state.read().await;
        state
            .addresses
            .iter()
            .find(|a| &a.allocation_id == allocation_id)
            .cloned()
    }

    /// All addresses currently allocated, for assertions.
    pub async fn address_count(&self) -> usize {
        self.state.read().await.addresses.len()
    }
}

#[async_trait]
impl NetworkProvider for InMemoryNetwork {
    async fn describe_addresses(&self, name_tag: &str) -> ProviderResult<Vec<Address>> {
        let state = self.state.read().await;
        Ok(state
            .addresses
            .iter()
            .filter(|a| a.name_tag == name_tag)
            .cloned()
            .collect())
    }

    async fn allocate_address(&self, name_tag: &str) -> ProviderResult<Address> {
        let mut state = self.state.write().await;
        if state.fail_allocation {
            return Err(ProviderError::Api("address limit exceeded".to_string()));
        }

        state.mutations.push(Mutation::AllocateAddress);

        let address = Address {
            allocation_id: AllocationId::new(format!("eipalloc-{}", Uuid::new_v4().simple())),
            public_ip: format!("203.0.113.{}", state.addresses.len() + 1),
            association_id: None,
            name_tag: name_tag.to_string(),
            allocated_at: Utc::now(),
        };
        state.addresses.push(address.clone());
        Ok(address)
    }

    async fn describe_gateways(
        &self,
        subnet_id: &SubnetId,
        gateway_state: GatewayState,
    ) -> ProviderResult<Vec<Gateway>> {
        let state = self.state.read().await;
        Ok(state
            .gateways
            .iter()
            .filter(|r| &r.gateway.subnet_id == subnet_id && r.gateway.state == gateway_state)
            .map(|r| r.gateway.clone())
            .collect())
    }

    async fn create_gateway(
        &self,
        subnet_id: &SubnetId,
        allocation_id: &AllocationId,
        name_tag: &str,
    ) -> ProviderResult<Gateway> {
        let mut state = self.state.write().await;
        if state.fail_gateway_creation {
            return Err(ProviderError::MalformedResponse(
                "no gateway identifier in response".to_string(),
            ));
        }
        if !state
            .addresses
            .iter()
            .any(|a| &a.allocation_id == allocation_id)
        {
            return Err(ProviderError::Api(format!(
                "allocation {} does not exist",
                allocation_id
            )));
        }

        state.mutations.push(Mutation::CreateGateway);

        // The association forms as part of gateway creation, and the
        // gateway inherits the bound address's public IP.
        let mut public_ip = None;
        if let Some(address) = state
            .addresses
            .iter_mut()
            .find(|a| &a.allocation_id == allocation_id)
        {
            address.association_id = Some(format!("eipassoc-{}", Uuid::new_v4().simple()));
            public_ip = Some(address.public_ip.clone());
        }

        let gateway = Gateway {
            id: GatewayId::new(format!("nat-{}", Uuid::new_v4().simple())),
            subnet_id: subnet_id.clone(),
            allocation_id: allocation_id.clone(),
            public_ip,
            state: GatewayState::Pending,
            name_tag: name_tag.to_string(),
            created_at: Utc::now(),
        };

        let settle_in = state.settle_polls;
        state.gateways.push(GatewayRecord {
            gateway: gateway.clone(),
            settle_in,
        });
        Ok(gateway)
    }

    async fn delete_gateway(&self, gateway_id: &GatewayId) -> ProviderResult<()> {
        let mut state = self.state.write().await;
        let settle_in = state.settle_polls;

        let allocation_id = {
            let record = state
                .gateways
                .iter_mut()
                .find(|r| &r.gateway.id == gateway_id)
                .ok_or_else(|| {
                    ProviderError::Api(format!("gateway {} does not exist", gateway_id))
                })?;
            record.gateway.state = GatewayState::Deleting;
            record.settle_in = settle_in;
            record.gateway.allocation_id.clone()
        };

        // The association dissolves as the gateway goes away; the address
        // itself stays allocated.
        if let Some(address) = state
            .addresses
            .iter_mut()
            .find(|a| a.allocation_id == allocation_id)
        {
            address.association_id = None;
        }

        state.mutations.push(Mutation::DeleteGateway);
        Ok(())
    }

    async fn gateway_state(&self, gateway_id: &GatewayId) -> ProviderResult<GatewayState> {
        let mut state = self.state.write().await;
        let record = state
            .gateways
            .iter_mut()
            .find(|r| &r.gateway.id == gateway_id)
            .ok_or_else(|| ProviderError::Api(format!("gateway {} does not exist", gateway_id)))?;

        if !record.gateway.state.is_terminal() {
            if record.settle_in == 0 {
                record.gateway.state = match record.gateway.state {
                    GatewayState::Pending => GatewayState::Available,
                    GatewayState::Deleting => GatewayState::Deleted,
                    other => other,
                };
            } else {
                record.settle_in -= 1;
            }
        }

        Ok(record.gateway.state)
    }

    async fn describe_route_tables(&self, subnet_id: &SubnetId) -> ProviderResult<Vec<RouteTable>> {
        let state = self.state.read().await;
        Ok(state
            .tables
            .iter()
            .filter(|t| &t.subnet_id == subnet_id)
            .cloned()
            .collect())
    }

    async fn create_route(
        &self,
        table_id: &RouteTableId,
        destination: &str,
        gateway_id: &GatewayId,
    ) -> ProviderResult<()> {
        let mut state = self.state.write().await;
        if state.fail_tables.contains(table_id) {
            return Err(ProviderError::Transport("injected failure".to_string()));
        }

        let table = state
            .tables
            .iter_mut()
            .find(|t| &t.id == table_id)
            .ok_or_else(|| ProviderError::Api(format!("table {} does not exist", table_id)))?;

        if table.routes.iter().any(|r| r.destination == destination) {
            return Err(ProviderError::Api(format!(
                "route for {} already exists in {}",
                destination, table_id
            )));
        }

        table.routes.push(Route {
            destination: destination.to_string(),
            gateway_id: Some(gateway_id.clone()),
        });
        state.mutations.push(Mutation::CreateRoute(table_id.clone()));
        Ok(())
    }

    async fn replace_route(
        &self,
        table_id: &RouteTableId,
        destination: &str,
        gateway_id: &GatewayId,
    ) -> ProviderResult<()> {
        let mut state = self.state.write().await;
        if state.fail_tables.contains(table_id) {
            return Err(ProviderError::Transport("injected failure".to_string()));
        }

        let table = state
            .tables
            .iter_mut()
            .find(|t| &t.id == table_id)
            .ok_or_else(|| ProviderError::Api(format!("table {} does not exist", table_id)))?;

        let route = table
            .routes
            .iter_mut()
            .find(|r| r.destination == destination)
            .ok_or_else(|| {
                ProviderError::Api(format!("no route for {} in {}", destination, table_id))
            })?;

        route.gateway_id = Some(gateway_id.clone());
        state.mutations.push(Mutation::ReplaceRoute(table_id.clone()));
        Ok(())
    }

    async fn delete_route(
        &self,
        table_id: &RouteTableId,
        destination: &str,
    ) -> ProviderResult<()> {
        let mut state = self.state.write().await;
        if state.fail_tables.contains(table_id) {
            return Err(ProviderError::Transport("injected failure".to_string()));
        }

        let table = state
            .tables
            .iter_mut()
            .find(|t| &t.id == table_id)
            .ok_or_else(|| ProviderError::Api(format!("table {} does not exist", table_id)))?;

        let before = table.routes.len();
        table.routes.retain(|r| r.destination != destination);
        if table.routes.len() == before {
            return Err(ProviderError::Api(format!(
                "no route for {} in {}",
                destination, table_id
            )));
        }

        state.mutations.push(Mutation::DeleteRoute(table_id.clone()));
        Ok(())
    }
}
