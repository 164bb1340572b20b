//! 设置树文档
//!
//! 所有节点存放在文档拥有的 arena 中，通过带代数的 [`SettingId`] 访问。
//! 删除节点会释放其整个子树并递增槽位代数，旧句柄因此失效（`StaleHandle`），
//! 其他句柄不受影响。

use super::error::SettingError;
use super::path::{format_path, is_valid_name, parse_path, PathSegment};
use super::setting::Setting;
use super::value::{FromValue, SettingType, Value};
use lcfg_config::IntFormat;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

const TARGET: &str = "lcfg::tree";

/// 设置节点句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SettingId {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Group {
        order: Vec<SettingId>,
        by_name: HashMap<String, SettingId>,
    },
    List(Vec<SettingId>),
    Array(Vec<SettingId>),
    Scalar(Value),
}

impl NodeKind {
    pub(crate) fn empty(setting_type: SettingType) -> Self {
        match setting_type {
            SettingType::Group => NodeKind::Group {
                order: Vec::new(),
                by_name: HashMap::new(),
            },
            SettingType::List => NodeKind::List(Vec::new()),
            SettingType::Array => NodeKind::Array(Vec::new()),
            scalar => match scalar.default_value() {
                Some(value) => NodeKind::Scalar(value),
                None => NodeKind::List(Vec::new()),
            },
        }
    }

    pub(crate) fn setting_type(&self) -> SettingType {
        match self {
            NodeKind::Group { .. } => SettingType::Group,
            NodeKind::List(_) => SettingType::List,
            NodeKind::Array(_) => SettingType::Array,
            NodeKind::Scalar(value) => value.setting_type(),
        }
    }

    /// 子节点（按顺序）
    pub(crate) fn children(&self) -> &[SettingId] {
        match self {
            NodeKind::Group { order, .. } => order,
            NodeKind::List(items) | NodeKind::Array(items) => items,
            NodeKind::Scalar(_) => &[],
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) name: Option<String>,
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<SettingId>,
    pub(crate) source_line: usize,
    pub(crate) source_file: Option<Arc<Path>>,
    pub(crate) format: IntFormat,
}

impl Node {
    pub(crate) fn new(name: Option<String>, kind: NodeKind) -> Self {
        Self {
            name,
            kind,
            parent: None,
            source_line: 0,
            source_file: None,
            format: IntFormat::Decimal,
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// 配置文档：拥有根分组及全部节点
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: SettingId,
    search_paths: Vec<PathBuf>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// 创建只有空根分组的文档
    pub fn new() -> Self {
        let root_node = Node::new(None, NodeKind::empty(SettingType::Group));
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(root_node),
            }],
            free: Vec::new(),
            root: SettingId {
                index: 0,
                generation: 0,
            },
            search_paths: Vec::new(),
        }
    }

    // ==================== 读取 ====================

    pub fn root_id(&self) -> SettingId {
        self.root
    }

    pub fn root(&self) -> Setting<'_> {
        match self.node(self.root) {
            Some(node) => Setting::new(self, self.root, node),
            // 根节点永不释放
            None => unreachable!("document root is never freed"),
        }
    }

    /// 按句柄取得设置视图
    pub fn setting(&self, id: SettingId) -> Result<Setting<'_>, SettingError> {
        self.node(id)
            .map(|node| Setting::new(self, id, node))
            .ok_or(SettingError::StaleHandle)
    }

    /// 按路径查找设置
    pub fn lookup(&self, path: &str) -> Result<Setting<'_>, SettingError> {
        self.root().lookup(path)
    }

    /// 路径是否存在
    pub fn exists(&self, path: &str) -> bool {
        self.lookup(path).is_ok()
    }

    /// 按路径读取指定类型的值，类型不符时返回 `WrongType`
    pub fn get<T: FromValue>(&self, path: &str) -> Result<T, SettingError> {
        self.lookup(path)?.value_as::<T>()
    }

    /// 按路径读取值，缺失或类型不符时返回 None
    pub fn lookup_value<T: FromValue>(&self, path: &str) -> Option<T> {
        self.get(path).ok()
    }

    /// 包含文件搜索路径
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    pub fn set_search_paths(&mut self, paths: Vec<PathBuf>) {
        self.search_paths = paths;
    }

    pub fn add_search_path(&mut self, path: impl Into<PathBuf>) {
        self.search_paths.push(path.into());
    }

    /// 存活的节点总数（含根）
    pub fn node_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    // ==================== 修改 ====================

    /// 替换路径处标量的值
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<(), SettingError> {
        let id = self.lookup(path)?.id();
        self.set_value(id, value)
    }

    /// 在父路径下添加子设置，返回新句柄
    pub fn add(
        &mut self,
        parent_path: &str,
        name: Option<&str>,
        setting_type: SettingType,
    ) -> Result<SettingId, SettingError> {
        let parent = self.lookup(parent_path)?.id();
        self.add_child(parent, name, setting_type)
    }

    /// 删除路径处的设置及其子树
    pub fn remove(&mut self, path: &str) -> Result<(), SettingError> {
        let id = self.lookup(path)?.id();
        self.remove_setting(id)
    }

    /// 替换标量的值
    pub fn set_value(
        &mut self,
        id: SettingId,
        value: impl Into<Value>,
    ) -> Result<(), SettingError> {
        let value = value.into();
        let setting = self.setting(id)?;
        let path = setting.path();
        let current = setting.setting_type();

        if current.is_aggregate() {
            return Err(SettingError::WrongType {
                path,
                expected: value.setting_type(),
                found: current,
            });
        }
        if let Value::Float(f) = value {
            if !f.is_finite() {
                return Err(SettingError::NonFiniteFloat { path });
            }
        }
        if let Some(parent) = setting.parent() {
            // 数组元素只能保持数组的元素类型
            if parent.setting_type() == SettingType::Array
                && parent.len() > 1
                && value.setting_type() != current
            {
                return Err(SettingError::WrongType {
                    path,
                    expected: current,
                    found: value.setting_type(),
                });
            }
        }

        debug!(target: TARGET, path = %path, value = ?value, "set value");
        if let Some(node) = self.node_mut(id) {
            node.kind = NodeKind::Scalar(value);
        }
        Ok(())
    }

    /// 设置整数的显示格式
    pub fn set_format(&mut self, id: SettingId, format: IntFormat) -> Result<(), SettingError> {
        let setting = self.setting(id)?;
        let found = setting.setting_type();
        if !matches!(found, SettingType::Integer | SettingType::Int64) {
            return Err(SettingError::WrongType {
                path: setting.path(),
                expected: SettingType::Integer,
                found,
            });
        }
        if let Some(node) = self.node_mut(id) {
            node.format = format;
        }
        Ok(())
    }

    /// 在聚合设置下添加子设置
    ///
    /// 分组的子设置必须有合法且唯一的名称；列表与数组的子设置不能命名。
    /// 数组只接受与现有元素同类型的标量。标量以该类型的零值初始化。
    pub fn add_child(
        &mut self,
        parent: SettingId,
        name: Option<&str>,
        setting_type: SettingType,
    ) -> Result<SettingId, SettingError> {
        let parent_view = self.setting(parent)?;
        match parent_view.setting_type() {
            SettingType::Group => {
                let name = name.ok_or_else(|| SettingError::InvalidName {
                    name: String::new(),
                })?;
                if !is_valid_name(name) {
                    return Err(SettingError::InvalidName {
                        name: name.to_string(),
                    });
                }
                if parent_view.member(name).is_some() {
                    return Err(SettingError::DuplicateName {
                        name: name.to_string(),
                    });
                }
            }
            SettingType::List => {
                if let Some(name) = name {
                    return Err(SettingError::InvalidName {
                        name: name.to_string(),
                    });
                }
            }
            SettingType::Array => {
                if let Some(name) = name {
                    return Err(SettingError::InvalidName {
                        name: name.to_string(),
                    });
                }
                check_array_element(&parent_view, setting_type)?;
            }
            _ => {
                return Err(SettingError::NotAggregate {
                    path: parent_view.path(),
                })
            }
        }

        let node = Node::new(name.map(str::to_string), NodeKind::empty(setting_type));
        let id = self.attach(parent, node);
        debug!(target: TARGET, parent = %self.path_of(parent), ?name, %setting_type, "add setting");
        Ok(id)
    }

    /// 向列表或数组末尾追加标量元素
    pub fn push_value(
        &mut self,
        parent: SettingId,
        value: impl Into<Value>,
    ) -> Result<SettingId, SettingError> {
        let value = value.into();
        if let Value::Float(f) = value {
            if !f.is_finite() {
                return Err(SettingError::NonFiniteFloat {
                    path: self.setting(parent)?.path(),
                });
            }
        }
        let id = self.add_child(parent, None, value.setting_type())?;
        if let Some(node) = self.node_mut(id) {
            node.kind = NodeKind::Scalar(value);
        }
        Ok(id)
    }

    /// 删除设置并释放其子树
    pub fn remove_setting(&mut self, id: SettingId) -> Result<(), SettingError> {
        let setting = self.setting(id)?;
        let parent = match setting.parent() {
            Some(parent) => parent.id(),
            None => return Err(SettingError::RootImmutable),
        };
        let name = setting.name().map(str::to_string);
        debug!(target: TARGET, path = %setting.path(), "remove setting");

        if let Some(parent_node) = self.node_mut(parent) {
            match &mut parent_node.kind {
                NodeKind::Group { order, by_name } => {
                    order.retain(|child| *child != id);
                    if let Some(name) = &name {
                        by_name.remove(name);
                    }
                }
                NodeKind::List(items) | NodeKind::Array(items) => items.retain(|child| *child != id),
                NodeKind::Scalar(_) => {}
            }
        }
        self.free_subtree(id);
        Ok(())
    }

    // ==================== 内部 ====================

    pub(crate) fn node(&self, id: SettingId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: SettingId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn path_of(&self, id: SettingId) -> String {
        self.setting(id).map(|s| s.path()).unwrap_or_default()
    }

    /// 分配节点并挂到父节点末尾（调用方负责校验）
    pub(crate) fn attach(&mut self, parent: SettingId, mut node: Node) -> SettingId {
        node.parent = Some(parent);
        let name = node.name.clone();
        let id = self.alloc(node);
        if let Some(parent_node) = self.node_mut(parent) {
            match &mut parent_node.kind {
                NodeKind::Group { order, by_name } => {
                    order.push(id);
                    if let Some(name) = name {
                        by_name.insert(name, id);
                    }
                }
                NodeKind::List(items) | NodeKind::Array(items) => items.push(id),
                NodeKind::Scalar(_) => {}
            }
        }
        id
    }

    fn alloc(&mut self, node: Node) -> SettingId {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                SettingId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                SettingId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    fn free_subtree(&mut self, id: SettingId) {
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let Some(slot) = self
                .slots
                .get_mut(current.index as usize)
                .filter(|slot| slot.generation == current.generation)
            else {
                continue;
            };
            if let Some(node) = slot.node.take() {
                pending.extend_from_slice(node.kind.children());
            }
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(current.index);
        }
    }

    /// 解析相对于 `start` 的路径
    pub(crate) fn resolve(&self, start: SettingId, path: &str) -> Result<SettingId, SettingError> {
        let segments = parse_path(path)?;
        let mut current = start;
        for (i, segment) in segments.iter().enumerate() {
            let node = self.node(current).ok_or(SettingError::StaleHandle)?;
            let not_found = || SettingError::NotFound {
                path: path.to_string(),
            };
            current = match (segment, &node.kind) {
                (PathSegment::Name(name), NodeKind::Group { by_name, .. }) => {
                    *by_name.get(name).ok_or_else(not_found)?
                }
                (PathSegment::Name(_), _) => return Err(not_found()),
                (PathSegment::Index(_), NodeKind::Scalar(_)) => return Err(not_found()),
                (PathSegment::Index(index), kind) => {
                    let children = kind.children();
                    *children
                        .get(*index)
                        .ok_or_else(|| SettingError::IndexOutOfRange {
                            path: format_path(&segments[..=i]),
                            index: *index,
                            len: children.len(),
                        })?
                }
            };
        }
        Ok(current)
    }
}

fn check_array_element(array: &Setting<'_>, setting_type: SettingType) -> Result<(), SettingError> {
    let expected = array
        .children()
        .next()
        .map(|first| first.setting_type());
    match expected {
        _ if setting_type.is_aggregate() => Err(SettingError::WrongType {
            path: array.path(),
            expected: expected.unwrap_or(SettingType::Integer),
            found: setting_type,
        }),
        Some(expected) if expected != setting_type => Err(SettingError::WrongType {
            path: array.path(),
            expected,
            found: setting_type,
        }),
        _ => Ok(()),
    }
}

impl PartialEq for Document {
    /// 结构相等：名称、类型、值与顺序一致；忽略源位置与整数格式
    fn eq(&self, other: &Self) -> bool {
        self.root() == other.root()
    }
}
