//! Catalog of the variables a model exposes.
//!
//! The catalog belongs to a model instance and is built when that instance is
//! initialized, so independent models never share it.

use crate::grid::GRID_ID;

/// Standard name of the plate temperature variable.
pub const TEMPERATURE: &str = "plate_surface__temperature";

/// Element type of a variable. The item size comes from the tag, never from
/// inspecting a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarType {
    Float64,
}

impl VarType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VarType::Float64 => "double",
        }
    }

    /// Bytes per element.
    pub fn itemsize(&self) -> usize {
        match self {
            VarType::Float64 => std::mem::size_of::<f64>(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarLocation {
    Node,
}

impl VarLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            VarLocation::Node => "node",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VariableInfo {
    pub name: &'static str,
    pub grid: i32,
    pub units: &'static str,
    pub var_type: VarType,
    pub location: VarLocation,
}

impl VariableInfo {
    pub fn itemsize(&self) -> usize {
        self.var_type.itemsize()
    }
}

#[derive(Clone, Debug, Default)]
pub struct VariableRegistry {
    vars: Vec<VariableInfo>,
}

impl VariableRegistry {
    /// Catalog of the heat model: the plate temperature on grid 0, in kelvin.
    pub fn heat() -> Self {
        let mut registry = VariableRegistry::default();
        registry.register(VariableInfo {
            name: TEMPERATURE,
            grid: GRID_ID,
            units: "K",
            var_type: VarType::Float64,
            location: VarLocation::Node,
        });
        registry
    }

    pub fn register(&mut self, info: VariableInfo) {
        self.vars.retain(|v| v.name != info.name);
        self.vars.push(info);
    }

    pub fn get(&self, name: &str) -> Option<&VariableInfo> {
        self.vars.iter().find(|v| v.name == name)
    }

    /// Grid a variable lives on, `None` for unknown names.
    pub fn grid_of(&self, name: &str) -> Option<i32> {
        self.get(name).map(|v| v.grid)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.vars.iter().map(|v| v.name).collect()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
