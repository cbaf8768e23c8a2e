//! Per-object script instances: one script, one native object, one owned
//! array of local variable values.

use std::any::Any;
use std::fmt;

use values::{ScriptValue, ValueKind};

use crate::error::InstanceError;
use crate::native::NativeClassDef;
use crate::script::{Script, ScriptVariable, VariableHandle};

/// Binds one `Script` to one native object and owns the storage for the
/// script's non-native variables. Construction fails when the object's
/// class is not a subtype of the class the script was linked against.
pub struct ScriptInstance<'obj> {
    script: &'obj Script,
    object: Option<&'obj dyn Any>,
    values: Vec<ScriptValue>,
}

impl<'obj> ScriptInstance<'obj> {
    pub fn new(
        script: &'obj Script,
        object: &'obj dyn Any,
        class: &'static NativeClassDef,
    ) -> Result<Self, InstanceError> {
        if let Some(linked) = script.native_class() {
            if !class.is_subtype_of(linked) {
                return Err(InstanceError::ClassMismatch {
                    object: class.name,
                    linked: linked.name,
                });
            }
        }
        Ok(Self {
            script,
            object: Some(object),
            values: vec![ScriptValue::zero(); script.num_instance_values()],
        })
    }

    /// An instance with no native object, for scripts that declare no
    /// native variables. Fails if the script is linked to a class.
    pub fn detached(script: &'obj Script) -> Result<Self, InstanceError> {
        if let Some(linked) = script.native_class() {
            return Err(InstanceError::ObjectRequired(linked.name));
        }
        Ok(Self {
            script,
            object: None,
            values: vec![ScriptValue::zero(); script.num_instance_values()],
        })
    }

    pub fn script(&self) -> &Script {
        self.script
    }

    /// Reads a variable as a float slot. Unbound native variables read as
    /// zero so degraded scripts still execute.
    pub(crate) fn read_float(&self, var: &ScriptVariable) -> f32 {
        if var.is_native {
            match (var.binding, self.object) {
                (Some(field), Some(obj)) => (field.get_float)(obj),
                _ => 0.0,
            }
        } else {
            self.values[var.slot as usize].as_float()
        }
    }

    /// Reads a variable as an int/bool slot; same zero rule as `read_float`.
    pub(crate) fn read_int(&self, var: &ScriptVariable) -> i32 {
        if var.is_native {
            match (var.binding, self.object) {
                (Some(field), Some(obj)) => (field.get_int)(obj) as i32,
                _ => 0,
            }
        } else {
            self.values[var.slot as usize].as_int()
        }
    }

    pub fn set_float(&mut self, handle: VariableHandle, value: f32) -> Result<(), InstanceError> {
        self.set(handle, ValueKind::Float, ScriptValue::from_float(value))
    }

    pub fn set_int(&mut self, handle: VariableHandle, value: i32) -> Result<(), InstanceError> {
        self.set(handle, ValueKind::Int, ScriptValue::from_int(value))
    }

    pub fn set_bool(&mut self, handle: VariableHandle, value: bool) -> Result<(), InstanceError> {
        self.set(handle, ValueKind::Bool, ScriptValue::from_bool(value))
    }

    fn set(
        &mut self,
        handle: VariableHandle,
        kind: ValueKind,
        value: ScriptValue,
    ) -> Result<(), InstanceError> {
        let var = self.script.variable(handle);
        if var.is_native {
            return Err(InstanceError::NativeVariable(var.name.clone()));
        }
        if var.kind != kind {
            return Err(InstanceError::KindMismatch {
                name: var.name.clone(),
                expected: var.kind,
                got: kind,
            });
        }
        self.values[var.slot as usize] = value;
        Ok(())
    }
}

impl fmt::Debug for ScriptInstance<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptInstance")
            .field("has_object", &self.object.is_some())
            .field("values", &self.values)
            .finish()
    }
}
