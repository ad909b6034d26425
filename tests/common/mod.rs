//! 集成测试使用的内存持久化引擎，记录每次调用

#![allow(dead_code)]

use async_trait::async_trait;
use rat_quickmodel::model::schema::SchemaDefinition;
use rat_quickmodel::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// 一次引擎调用
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub operation: &'static str,
    pub model: String,
    pub filter: Option<Filter>,
}

#[derive(Debug, Default)]
pub struct MemoryEngine {
    pub compile_count: AtomicUsize,
    collections: Mutex<HashMap<String, Vec<Document>>>,
    calls: Mutex<Vec<RecordedCall>>,
    next_id: AtomicUsize,
    fail_with: Mutex<Option<String>>,
    compile_fail_with: Mutex<Option<String>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn compiled(&self) -> usize {
        self.compile_count.load(Ordering::SeqCst)
    }

    /// 之后的文档操作都返回 QueryError
    pub fn fail_with(&self, message: &str) {
        *self.fail_with.lock().unwrap() = Some(message.to_string());
    }

    /// 之后的编译都返回 ConfigError
    pub fn fail_compile_with(&self, message: &str) {
        *self.compile_fail_with.lock().unwrap() = Some(message.to_string());
    }

    fn check(&self) -> QuickModelResult<()> {
        match self.fail_with.lock().unwrap().clone() {
            Some(message) => Err(QuickModelError::QueryError { message }),
            None => Ok(()),
        }
    }

    fn record(&self, operation: &'static str, model: &CompiledModel, filter: Option<&Filter>) {
        self.calls.lock().unwrap().push(RecordedCall {
            operation,
            model: model.name.clone(),
            filter: filter.cloned(),
        });
    }

    fn insert(&self, model: &CompiledModel, mut document: Document) -> DataValue {
        if !document.contains_key("id") {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            document.insert("id".to_string(), DataValue::String(format!("doc-{}", id)));
        }
        self.collections
            .lock()
            .unwrap()
            .entry(model.name.clone())
            .or_default()
            .push(document.clone());
        DataValue::Object(document)
    }

    fn matching(&self, model: &CompiledModel, filter: &Filter) -> Vec<Document> {
        self.collections
            .lock()
            .unwrap()
            .get(&model.name)
            .map(|docs| docs.iter().filter(|d| matches(d, filter)).cloned().collect())
            .unwrap_or_default()
    }

    fn apply(&self, model: &CompiledModel, filter: &Filter, patch: &UpdatePatch, limit: Option<usize>) -> Vec<(Document, Document)> {
        let mut collections = self.collections.lock().unwrap();
        let Some(docs) = collections.get_mut(&model.name) else {
            return Vec::new();
        };

        let mut changed = Vec::new();
        for doc in docs.iter_mut().filter(|d| matches(d, filter)) {
            if limit.is_some_and(|l| changed.len() >= l) {
                break;
            }
            let before = doc.clone();
            for op in patch {
                match op.operation {
                    UpdateOperator::Set => {
                        doc.insert(op.field.clone(), op.value.clone());
                    }
                    UpdateOperator::Unset => {
                        doc.remove(&op.field);
                    }
                    UpdateOperator::Increment => {
                        let current = doc.get(&op.field).and_then(DataValue::as_f64).unwrap_or(0.0);
                        let delta = op.value.as_f64().unwrap_or(0.0);
                        let value = match (doc.get(&op.field), &op.value) {
                            (Some(DataValue::Int(a)), DataValue::Int(b)) => DataValue::Int(a + b),
                            (None, DataValue::Int(b)) => DataValue::Int(*b),
                            _ => DataValue::Float(current + delta),
                        };
                        doc.insert(op.field.clone(), value);
                    }
                    _ => {}
                }
            }
            changed.push((before, doc.clone()));
        }
        changed
    }

    fn remove(&self, model: &CompiledModel, filter: &Filter, limit: Option<usize>) -> Vec<Document> {
        let mut collections = self.collections.lock().unwrap();
        let Some(docs) = collections.get_mut(&model.name) else {
            return Vec::new();
        };

        let mut removed = Vec::new();
        let mut kept = Vec::new();
        for doc in docs.drain(..) {
            if matches(&doc, filter) && limit.is_none_or(|l| removed.len() < l) {
                removed.push(doc);
            } else {
                kept.push(doc);
            }
        }
        *docs = kept;
        removed
    }
}

fn id_filter(id: &str) -> Filter {
    vec![QueryCondition::eq("id", id)]
}

fn matches(doc: &Document, filter: &Filter) -> bool {
    filter.iter().all(|condition| {
        let value = doc.get(&condition.field);
        let ordering = value
            .and_then(DataValue::as_f64)
            .zip(condition.value.as_f64())
            .and_then(|(a, b)| a.partial_cmp(&b));
        match condition.operator {
            QueryOperator::Eq => value == Some(&condition.value),
            QueryOperator::Ne => value != Some(&condition.value),
            QueryOperator::Gt => ordering.is_some_and(|o| o.is_gt()),
            QueryOperator::Gte => ordering.is_some_and(|o| o.is_ge()),
            QueryOperator::Lt => ordering.is_some_and(|o| o.is_lt()),
            QueryOperator::Lte => ordering.is_some_and(|o| o.is_le()),
            QueryOperator::In => match &condition.value {
                DataValue::Array(items) => value.is_some_and(|v| items.contains(v)),
                _ => false,
            },
            QueryOperator::NotIn => match &condition.value {
                DataValue::Array(items) => !value.is_some_and(|v| items.contains(v)),
                _ => true,
            },
            QueryOperator::Exists => value.is_some(),
            QueryOperator::Regex => false,
        }
    })
}

fn pick(pair: (Document, Document), options: &Option<ModifyOptions>) -> DataValue {
    let return_after = options.as_ref().is_some_and(|o| o.return_document == ReturnDocument::After);
    DataValue::Object(if return_after { pair.1 } else { pair.0 })
}

#[async_trait]
impl PersistenceEngine for MemoryEngine {
    fn compile(&self, name: &str, definition: &SchemaDefinition) -> QuickModelResult<CompiledSchema> {
        self.compile_count.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.compile_fail_with.lock().unwrap().clone() {
            return Err(QuickModelError::ConfigError { message });
        }
        rat_quickmodel::model::compile_json_schema(name, definition)
    }

    async fn create(&self, model: &CompiledModel, document: Document) -> QuickModelResult<DataValue> {
        self.record("create", model, None);
        self.check()?;
        Ok(self.insert(model, document))
    }

    async fn create_many(&self, model: &CompiledModel, documents: Vec<Document>) -> QuickModelResult<Vec<DataValue>> {
        self.record("create_many", model, None);
        self.check()?;
        Ok(documents.into_iter().map(|d| self.insert(model, d)).collect())
    }

    async fn find(&self, model: &CompiledModel, filter: Filter) -> QuickModelResult<Vec<DataValue>> {
        self.record("find", model, Some(&filter));
        self.check()?;
        Ok(self.matching(model, &filter).into_iter().map(DataValue::Object).collect())
    }

    async fn find_one(&self, model: &CompiledModel, filter: Filter) -> QuickModelResult<Option<DataValue>> {
        self.record("find_one", model, Some(&filter));
        self.check()?;
        Ok(self.matching(model, &filter).into_iter().next().map(DataValue::Object))
    }

    async fn find_by_id(&self, model: &CompiledModel, id: &str) -> QuickModelResult<Option<DataValue>> {
        self.record("find_by_id", model, None);
        self.check()?;
        Ok(self.matching(model, &id_filter(id)).into_iter().next().map(DataValue::Object))
    }

    async fn update(&self, model: &CompiledModel, filter: Filter, patch: UpdatePatch) -> QuickModelResult<u64> {
        self.record("update", model, Some(&filter));
        self.check()?;
        Ok(self.apply(model, &filter, &patch, None).len() as u64)
    }

    async fn update_one(&self, model: &CompiledModel, filter: Filter, patch: UpdatePatch) -> QuickModelResult<u64> {
        self.record("update_one", model, Some(&filter));
        self.check()?;
        Ok(self.apply(model, &filter, &patch, Some(1)).len() as u64)
    }

    async fn find_one_and_update(
        &self,
        model: &CompiledModel,
        filter: Filter,
        patch: UpdatePatch,
        options: Option<ModifyOptions>,
    ) -> QuickModelResult<Option<DataValue>> {
        self.record("find_one_and_update", model, Some(&filter));
        self.check()?;
        Ok(self.apply(model, &filter, &patch, Some(1)).into_iter().next().map(|p| pick(p, &options)))
    }

    async fn find_by_id_and_update(
        &self,
        model: &CompiledModel,
        id: &str,
        patch: UpdatePatch,
        options: Option<ModifyOptions>,
    ) -> QuickModelResult<Option<DataValue>> {
        self.record("find_by_id_and_update", model, None);
        self.check()?;
        Ok(self.apply(model, &id_filter(id), &patch, Some(1)).into_iter().next().map(|p| pick(p, &options)))
    }

    async fn delete(&self, model: &CompiledModel, filter: Filter) -> QuickModelResult<u64> {
        self.record("delete", model, Some(&filter));
        self.check()?;
        Ok(self.remove(model, &filter, None).len() as u64)
    }

    async fn delete_one(&self, model: &CompiledModel, filter: Filter) -> QuickModelResult<u64> {
        self.record("delete_one", model, Some(&filter));
        self.check()?;
        Ok(self.remove(model, &filter, Some(1)).len() as u64)
    }

    async fn find_one_and_delete(&self, model: &CompiledModel, filter: Filter) -> QuickModelResult<Option<DataValue>> {
        self.record("find_one_and_delete", model, Some(&filter));
        self.check()?;
        Ok(self.remove(model, &filter, Some(1)).into_iter().next().map(DataValue::Object))
    }

    async fn find_by_id_and_delete(&self, model: &CompiledModel, id: &str) -> QuickModelResult<Option<DataValue>> {
        self.record("find_by_id_and_delete", model, None);
        self.check()?;
        Ok(self.remove(model, &id_filter(id), Some(1)).into_iter().next().map(DataValue::Object))
    }

    async fn count(&self, model: &CompiledModel, filter: Filter) -> QuickModelResult<u64> {
        self.record("count", model, Some(&filter));
        self.check()?;
        Ok(self.matching(model, &filter).len() as u64)
    }

    async fn aggregate(&self, model: &CompiledModel, pipeline: Vec<PipelineStage>) -> QuickModelResult<Vec<DataValue>> {
        self.record("aggregate", model, None);
        self.check()?;
        Ok(pipeline)
    }
}

/// 创建文档的便捷函数
pub fn document(pairs: &[(&str, DataValue)]) -> Document {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}
