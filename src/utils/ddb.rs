use std::collections::HashMap;
use std::time::Duration;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::{Credentials, Region};
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsError;
use aws_sdk_dynamodb::types::{AttributeDefinition, AttributeValue, GlobalSecondaryIndex, KeySchemaElement, KeyType, Projection, ProjectionType, ProvisionedThroughput, Put, ScalarAttributeType, TableStatus};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::RepositoryStore;

const LOCAL_ENDPOINT: &str = "http://localhost:8000";

// TableSpec names a table, its hash key, the hash/range keys of its main GSI and an optional
// second GSI
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TableSpec {
    pub name: &'static str,
    pub pk: &'static str,
    pub gsi_pk: &'static str,
    pub gsi_sk: &'static str,
    pub lookup: Option<IndexSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct IndexSpec {
    pub pk: &'static str,
    pub sk: &'static str,
}

impl TableSpec {
    pub fn index_name(&self) -> String {
        format!("{}_ndx", self.name)
    }

    pub fn lookup_index_name(&self) -> Option<String> {
        self.lookup.map(|ndx| format!("{}_{}_ndx", self.name, ndx.pk))
    }

    // attributes named by the key schemas, each once
    pub fn key_attributes(&self) -> Vec<&'static str> {
        let mut attrs = vec![self.pk, self.gsi_pk, self.gsi_sk];
        if let Some(ndx) = self.lookup {
            attrs.push(ndx.pk);
            attrs.push(ndx.sk);
        }
        let mut defined: Vec<&'static str> = vec![];
        for attr in attrs {
            if !defined.contains(&attr) {
                defined.push(attr);
            }
        }
        defined
    }
}

pub(crate) const ITEMS_TABLE: TableSpec = TableSpec { name: "items", pk: "barcode", gsi_pk: "item_status", gsi_sk: "material_type", lookup: None };
pub(crate) const PATRONS_TABLE: TableSpec = TableSpec { name: "patrons", pk: "patron_id", gsi_pk: "patron_group", gsi_sk: "full_name", lookup: None };
// the open loan of an item is read by key from the item_barcode index
pub(crate) const LOANS_TABLE: TableSpec = TableSpec {
    name: "loans", pk: "loan_id", gsi_pk: "loan_status", gsi_sk: "due_at",
    lookup: Some(IndexSpec { pk: "item_barcode", sk: "loan_status" }),
};
pub(crate) const HOLDS_TABLE: TableSpec = TableSpec { name: "holds", pk: "hold_id", gsi_pk: "item_barcode", gsi_sk: "created_at", lookup: None };
pub(crate) const RULES_TABLE: TableSpec = TableSpec { name: "rules", pk: "rule_id", gsi_pk: "patron_group", gsi_sk: "material_type", lookup: None };
pub(crate) const TRANSACTIONS_TABLE: TableSpec = TableSpec { name: "transactions", pk: "transaction_id", gsi_pk: "patron_id", gsi_sk: "timestamp", lookup: None };
pub(crate) const EVENTS_TABLE: TableSpec = TableSpec { name: "events", pk: "event_id", gsi_pk: "group", gsi_sk: "key", lookup: None };

pub(crate) const ALL_TABLES: [TableSpec; 7] = [ITEMS_TABLE, PATRONS_TABLE, LOANS_TABLE, HOLDS_TABLE,
    RULES_TABLE, TRANSACTIONS_TABLE, EVENTS_TABLE];

fn build_gsi(index_name: String, pk: &str, sk: &str) -> GlobalSecondaryIndex {
    GlobalSecondaryIndex::builder()
        .index_name(index_name)
        .key_schema(KeySchemaElement::builder()
            .attribute_name(pk)
            .key_type(KeyType::Hash).build())
        .key_schema(KeySchemaElement::builder()
            .attribute_name(sk)
            .key_type(KeyType::Range).build())
        .projection(Projection::builder().projection_type(ProjectionType::All).build())
        .provisioned_throughput(
            ProvisionedThroughput::builder().read_capacity_units(10).write_capacity_units(10).build())
        .build()
}

pub(crate) async fn create_table(client: &Client, spec: &TableSpec) -> LibraryResult<()> {
    let mut request = client
        .create_table()
        .table_name(spec.name)
        .global_secondary_indexes(build_gsi(spec.index_name(), spec.gsi_pk, spec.gsi_sk))
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(spec.pk)
                .key_type(KeyType::Hash)
                .build(),
        )
        .provisioned_throughput(
            ProvisionedThroughput::builder()
                .read_capacity_units(10)
                .write_capacity_units(10)
                .build(),
        );
    if let (Some(ndx), Some(index_name)) = (spec.lookup, spec.lookup_index_name()) {
        request = request.global_secondary_indexes(build_gsi(index_name, ndx.pk, ndx.sk));
    }
    // attribute definitions must be unique
    for attr in spec.key_attributes() {
        request = request.attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(attr)
                .attribute_type(ScalarAttributeType::S)
                .build());
    }
    match request.send().await {
        Ok(_k) => {
            wait_until_table_status_is_not(client, spec.name, TableStatus::Creating).await;
            Ok(())
        }
        Err(err) => {
            Err(LibraryError::database_or_unavailable(format!("failed to create {} table due to {}",
                                                              spec.name, err).as_str(), None, false))
        }
    }
}

// creates every table of the engine, existing tables are left alone
pub(crate) async fn create_tables(client: &Client) {
    for spec in ALL_TABLES.iter() {
        let _ = create_table(client, spec).await;
    }
}

pub(crate) async fn delete_table(client: &Client, table_name: &str) -> LibraryResult<()> {
    match client.delete_table().table_name(table_name).send().await {
        Ok(_k) => {
            wait_until_table_status_is_not(client, table_name, TableStatus::Deleting).await;
            Ok(())
        }
        Err(err) => {
            Err(LibraryError::database_or_unavailable(format!("failed to delete {} table due to {}",
                                                              table_name, err).as_str(), None, false))
        }
    }
}

async fn wait_until_table_status_is_not(client: &Client, table_name: &str, other_status: TableStatus) {
    for _i in 0..30 {
        if let Ok(status) = describe_table(client, table_name).await {
            if status != other_status {
                return;
            }
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}

async fn describe_table(client: &Client, table_name: &str) -> LibraryResult<TableStatus> {
    match client
        .describe_table()
        .table_name(table_name)
        .send()
        .await
    {
        Ok(out) => {
            if let Some(table) = out.table() {
                if let Some(status) = table.table_status() {
                    return Ok(status.clone());
                }
            }
            Err(LibraryError::runtime(format!("failed to describe {} table",
                                              table_name).as_str(), None))
        }
        Err(err) => {
            Err(LibraryError::database_or_unavailable(format!("failed to describe {} table due to {}",
                                                              table_name, err).as_str(), None, false))
        }
    }
}

pub(crate) fn parse_item(value: Value) -> Result<HashMap<String, AttributeValue>, String> {
    match value_to_item(value) {
        AttributeValue::M(map) => Ok(map),
        other => Err(format!("failed to parse{:?}", other)),
    }
}

// parse_entity reverses parse_item through the serde representation of the entity
pub(crate) fn parse_entity<T: DeserializeOwned>(map: &HashMap<String, AttributeValue>) -> LibraryResult<T> {
    let object: Map<String, Value> = map.iter()
        .map(|(k, v)| (k.to_string(), item_to_value(v)))
        .collect();
    Ok(serde_json::from_value(Value::Object(object))?)
}

pub(crate) fn to_item<T: Serialize>(entity: &T) -> LibraryResult<HashMap<String, AttributeValue>> {
    Ok(parse_item(serde_json::to_value(entity)?)?)
}

fn value_to_item(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s),
        Value::Array(a) => AttributeValue::L(a.into_iter().map(value_to_item).collect()),
        Value::Object(o) => {
            AttributeValue::M(o.into_iter().map(|(k, v)| (k, value_to_item(v))).collect())
        }
    }
}

fn item_to_value(attr: &AttributeValue) -> Value {
    match attr {
        AttributeValue::S(s) => Value::String(s.to_string()),
        AttributeValue::N(n) => {
            if let Ok(i) = n.parse::<i64>() {
                Value::Number(Number::from(i))
            } else {
                n.parse::<f64>().ok().and_then(Number::from_f64).map(Value::Number).unwrap_or(Value::Null)
            }
        }
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::L(list) => Value::Array(list.iter().map(item_to_value).collect()),
        AttributeValue::M(map) => {
            Value::Object(map.iter().map(|(k, v)| (k.to_string(), item_to_value(v))).collect())
        }
        _ => Value::Null,
    }
}

// new_put writes a row that must not exist yet
pub(crate) fn new_put<T: Serialize>(spec: &TableSpec, entity: &T) -> LibraryResult<Put> {
    Ok(Put::builder()
        .table_name(spec.name)
        .set_item(Some(to_item(entity)?))
        .condition_expression("attribute_not_exists(#pk)")
        .expression_attribute_names("#pk", spec.pk)
        .build())
}

// versioned_put replaces a row only if it still has the version that was read, the stored
// row gets the next version
pub(crate) fn versioned_put<T: Serialize + Identifiable>(spec: &TableSpec, entity: &T) -> LibraryResult<Put> {
    Ok(Put::builder()
        .table_name(spec.name)
        .set_item(Some(versioned_item(entity)?))
        .condition_expression("attribute_exists(#pk) AND #version = :old_version")
        .expression_attribute_names("#pk", spec.pk)
        .expression_attribute_names("#version", "version")
        .expression_attribute_values(":old_version", AttributeValue::N(entity.version().to_string()))
        .build())
}

fn versioned_item<T: Serialize + Identifiable>(entity: &T) -> LibraryResult<HashMap<String, AttributeValue>> {
    let mut value = serde_json::to_value(entity)?;
    if let Some(object) = value.as_object_mut() {
        object.insert("version".to_string(), Value::Number(Number::from(entity.version() + 1)));
    }
    Ok(parse_item(value)?)
}

// DDBTable wraps the single-table calls shared by all DynamoDB repositories
#[derive(Debug, Clone)]
pub(crate) struct DDBTable {
    client: Client,
    spec: TableSpec,
}

impl DDBTable {
    pub(crate) fn new(client: Client, spec: TableSpec) -> Self {
        Self { client, spec }
    }

    pub(crate) fn spec(&self) -> &TableSpec {
        &self.spec
    }

    pub(crate) async fn put_new<T: Serialize + Identifiable>(&self, entity: &T) -> LibraryResult<usize> {
        self.client
            .put_item()
            .table_name(self.spec.name)
            .set_item(Some(to_item(entity)?))
            .condition_expression("attribute_not_exists(#pk)")
            .expression_attribute_names("#pk", self.spec.pk)
            .send()
            .await.map(|_| 1).map_err(|err| {
            let duplicate = matches!(&err, SdkError::ServiceError(ctx) if ctx.err().is_conditional_check_failed_exception());
            if duplicate {
                LibraryError::duplicate_key(format!("{} {} already exists", self.spec.name, entity.id()).as_str())
            } else {
                LibraryError::from(err)
            }
        })
    }

    pub(crate) async fn put_versioned<T: Serialize + Identifiable>(&self, entity: &T) -> LibraryResult<usize> {
        self.client
            .put_item()
            .table_name(self.spec.name)
            .set_item(Some(versioned_item(entity)?))
            .condition_expression("attribute_exists(#pk) AND #version = :old_version")
            .expression_attribute_names("#pk", self.spec.pk)
            .expression_attribute_names("#version", "version")
            .expression_attribute_values(":old_version", AttributeValue::N(entity.version().to_string()))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, id: &str) -> LibraryResult<T> {
        let out = self.client
            .get_item()
            .table_name(self.spec.name)
            .key(self.spec.pk, AttributeValue::S(id.to_string()))
            .consistent_read(true)
            .send()
            .await?;
        match out.item() {
            Some(map) => parse_entity(map),
            None => Err(LibraryError::not_found(format!("{} not found for {}", self.spec.name, id).as_str())),
        }
    }

    pub(crate) async fn delete(&self, id: &str) -> LibraryResult<usize> {
        self.client.delete_item()
            .table_name(self.spec.name)
            .key(self.spec.pk, AttributeValue::S(id.to_string()))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    // query_index reads every page of the GSI matching the key condition
    pub(crate) async fn query_index<T: DeserializeOwned>(&self, key_cond: &str, filter: Option<&str>,
                                                         names: &[(&str, &str)],
                                                         values: &[(&str, AttributeValue)],
                                                         forward: bool) -> LibraryResult<Vec<T>> {
        self.query_named(self.spec.index_name(), key_cond, filter, names, values, forward).await
    }

    pub(crate) async fn query_lookup<T: DeserializeOwned>(&self, key_cond: &str,
                                                          values: &[(&str, AttributeValue)]) -> LibraryResult<Vec<T>> {
        let index_name = self.spec.lookup_index_name().ok_or_else(|| LibraryError::runtime(
            format!("table {} has no lookup index", self.spec.name).as_str(), None))?;
        self.query_named(index_name, key_cond, None, &[], values, true).await
    }

    async fn query_named<T: DeserializeOwned>(&self, index_name: String, key_cond: &str, filter: Option<&str>,
                                              names: &[(&str, &str)],
                                              values: &[(&str, AttributeValue)],
                                              forward: bool) -> LibraryResult<Vec<T>> {
        let mut records = vec![];
        let mut exclusive_start_key = None;
        loop {
            let mut request = self.client
                .query()
                .table_name(self.spec.name)
                .index_name(index_name.as_str())
                .key_condition_expression(key_cond)
                .scan_index_forward(forward)
                .set_exclusive_start_key(exclusive_start_key.take());
            if let Some(filter) = filter {
                request = request.filter_expression(filter);
            }
            for (k, v) in names {
                request = request.expression_attribute_names(*k, *v);
            }
            for (k, v) in values {
                request = request.expression_attribute_values(*k, v.clone());
            }
            let out = request.send().await?;
            for map in out.items().unwrap_or_default() {
                records.push(parse_entity(map)?);
            }
            match out.last_evaluated_key() {
                Some(key) => exclusive_start_key = Some(key.clone()),
                None => return Ok(records),
            }
        }
    }

    pub(crate) async fn scan<T: DeserializeOwned>(&self, filter: Option<&str>,
                                                  names: &[(&str, &str)],
                                                  values: &[(&str, AttributeValue)]) -> LibraryResult<Vec<T>> {
        let mut records = vec![];
        let mut exclusive_start_key = None;
        loop {
            let mut request = self.client
                .scan()
                .table_name(self.spec.name)
                .consistent_read(true)
                .set_exclusive_start_key(exclusive_start_key.take());
            if let Some(filter) = filter {
                request = request.filter_expression(filter);
            }
            for (k, v) in names {
                request = request.expression_attribute_names(*k, *v);
            }
            for (k, v) in values {
                request = request.expression_attribute_values(*k, v.clone());
            }
            let out = request.send().await?;
            for map in out.items().unwrap_or_default() {
                records.push(parse_entity(map)?);
            }
            match out.last_evaluated_key() {
                Some(key) => exclusive_start_key = Some(key.clone()),
                None => return Ok(records),
            }
        }
    }
}

// helper method to build db-client with tracing enabled
pub(crate) async fn build_db_client(store: &RepositoryStore) -> Client {
    match store {
        RepositoryStore::DynamoDB => {
            //Get config from environment.
            let config = aws_config::load_from_env().await;
            //Create the DynamoDB client.
            Client::new(&config)
        }
        _ => {
            // See https://docs.aws.amazon.com/sdk-for-rust/latest/dg/dynamodb-local.html
            let dynamodb_local_config = aws_sdk_dynamodb::Config::builder()
                .region(Region::new("local"))
                .credentials_provider(
                    Credentials::new("AKIDLOCALSTACK", "localstacksecret", None, None, "faked"))
                .endpoint_url(LOCAL_ENDPOINT)
                .build();
            Client::from_conf(dynamodb_local_config)
        }
    }
}

// helper method to build sns-client with tracing enabled
pub async fn build_sns_client() -> aws_sdk_sns::Client {
    //Get config from environment.
    let config = aws_config::load_from_env().await;
    aws_sdk_sns::Client::new(&config)
}

// required to enable CloudWatch error logging by the runtime
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        // disable printing the name of the module in every log line.
        .with_target(false)
        // this needs to be set to false, otherwise ANSI color codes will
        // show up in a confusing manner in CloudWatch logs.
        .with_ansi(false)
        // disabling time is handy because CloudWatch will add the ingestion time.
        .without_time()
        .json()
        .init();
}

impl From<SdkError<GetItemError>> for LibraryError {
    fn from(err: SdkError<GetItemError>) -> Self {
        let (retryable, reason) = retryable_sdk_error(&err);
        LibraryError::database_or_unavailable(format!("{:?}", err).as_str(), reason, retryable)
    }
}

impl From<SdkError<PutItemError>> for LibraryError {
    fn from(err: SdkError<PutItemError>) -> Self {
        if let SdkError::ServiceError(ctx) = &err {
            if ctx.err().is_conditional_check_failed_exception() {
                return LibraryError::conflict(format!("{:?}", err).as_str(),
                                              Some("ConditionalCheckFailed".to_string()));
            }
        }
        let (retryable, reason) = retryable_sdk_error(&err);
        LibraryError::database_or_unavailable(format!("{:?}", err).as_str(), reason, retryable)
    }
}

impl From<SdkError<DeleteItemError>> for LibraryError {
    fn from(err: SdkError<DeleteItemError>) -> Self {
        let (retryable, reason) = retryable_sdk_error(&err);
        LibraryError::database_or_unavailable(format!("{:?}", err).as_str(), reason, retryable)
    }
}

impl From<SdkError<QueryError>> for LibraryError {
    fn from(err: SdkError<QueryError>) -> Self {
        let (retryable, reason) = retryable_sdk_error(&err);
        LibraryError::database_or_unavailable(format!("{:?}", err).as_str(), reason, retryable)
    }
}

impl From<SdkError<ScanError>> for LibraryError {
    fn from(err: SdkError<ScanError>) -> Self {
        let (retryable, reason) = retryable_sdk_error(&err);
        LibraryError::database_or_unavailable(format!("{:?}", err).as_str(), reason, retryable)
    }
}

// a canceled transaction means one of its conditions failed or another transaction touched
// the same rows, both are lost races
pub(crate) fn is_lost_race(err: &TransactWriteItemsError) -> bool {
    err.is_transaction_canceled_exception()
}

impl From<SdkError<TransactWriteItemsError>> for LibraryError {
    fn from(err: SdkError<TransactWriteItemsError>) -> Self {
        if let SdkError::ServiceError(ctx) = &err {
            if is_lost_race(ctx.err()) {
                return LibraryError::conflict(format!("{:?}", err).as_str(),
                                              Some("TransactionCanceled".to_string()));
            }
        }
        let (retryable, reason) = retryable_sdk_error(&err);
        LibraryError::database_or_unavailable(format!("{:?}", err).as_str(), reason, retryable)
    }
}

fn retryable_sdk_error<T>(err: &SdkError<T>) -> (bool, Option<String>) {
    match err {
        SdkError::ConstructionFailure(_) => { (false, Some("ConstructionFailure".to_string())) }
        SdkError::TimeoutError(_) => { (true, Some("TimeoutError".to_string())) }
        SdkError::DispatchFailure(_) => { (true, Some("DispatchFailure".to_string())) }
        SdkError::ResponseError { .. } => { (true, Some("ResponseError".to_string())) }
        SdkError::ServiceError(ctx) => {
            (ctx.raw().http().status().is_server_error() || has_exceeded_limit(ctx.raw().http().body().bytes()), Some(ctx.raw().http().status().to_string()))
        }
        _ => { (true, Some("Unknown".to_string())) }
    }
}

// throughput errors read "...ExceededException"
fn has_exceeded_limit(opts: Option<&[u8]>) -> bool {
    opts.map(|b| b.windows(6).any(|w| w == b"ceeded")).unwrap_or(false)
}
