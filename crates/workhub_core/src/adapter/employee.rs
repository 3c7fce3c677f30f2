//! Employee collection mapping and directory queries.

use super::fields::{FieldReader, FieldSpec};
use super::{AdapterResult, MappingError, Operation, RecordAdapter, RecordMapping};
use crate::model::employee::{Employee, EmployeePatch, EmployeeStatus, NewEmployee};
use crate::model::{RecordId, ValidationError};
use crate::record::{Condition, FieldMap, Record, SortDirection};
use chrono::{DateTime, Utc};
use serde_json::Value;

const NAME: &str = "name_c";
const EMAIL: &str = "email_c";
const ROLE: &str = "role_c";
const DEPARTMENT: &str = "department_c";
const AVATAR: &str = "avatar_c";
const PHONE: &str = "phone_c";
const STATUS: &str = "status_c";

pub struct EmployeeRecords;

pub type EmployeeAdapter = RecordAdapter<EmployeeRecords>;

fn put_text(fields: &mut FieldMap, name: &str, value: Option<&String>) {
    if let Some(value) = value {
        fields.insert(name.to_string(), Value::from(value.as_str()));
    }
}

impl RecordMapping for EmployeeRecords {
    type Entity = Employee;
    type Draft = NewEmployee;
    type Patch = EmployeePatch;

    const COLLECTION: &'static str = "employee_c";
    const NOUN: &'static str = "employee";
    const PLURAL: &'static str = "employees";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec { ui: "name", remote: NAME },
        FieldSpec { ui: "email", remote: EMAIL },
        FieldSpec { ui: "role", remote: ROLE },
        FieldSpec { ui: "department", remote: DEPARTMENT },
        FieldSpec { ui: "avatar", remote: AVATAR },
        FieldSpec { ui: "phone", remote: PHONE },
        FieldSpec { ui: "status", remote: STATUS },
    ];
    const DEFAULT_ORDER: (&'static str, SortDirection) = (NAME, SortDirection::Asc);

    fn id(entity: &Employee) -> RecordId {
        entity.id
    }

    fn from_record(record: &Record) -> Result<Employee, MappingError> {
        let fields = FieldReader::new(Self::COLLECTION, record);
        Ok(Employee {
            id: record.id,
            name: fields.required_text(NAME)?,
            email: fields.text(EMAIL)?,
            role: fields.text(ROLE)?,
            department: fields.text(DEPARTMENT)?,
            avatar: fields.text(AVATAR)?,
            phone: fields.text(PHONE)?,
            status: fields.parsed_or(STATUS, EmployeeStatus::Active, EmployeeStatus::parse)?,
        })
    }

    fn to_fields(employee: &Employee) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert(NAME.into(), Value::from(employee.name.as_str()));
        fields.insert(EMAIL.into(), Value::from(employee.email.as_str()));
        fields.insert(ROLE.into(), Value::from(employee.role.as_str()));
        fields.insert(DEPARTMENT.into(), Value::from(employee.department.as_str()));
        fields.insert(AVATAR.into(), Value::from(employee.avatar.as_str()));
        fields.insert(PHONE.into(), Value::from(employee.phone.as_str()));
        fields.insert(STATUS.into(), Value::from(employee.status.as_str()));
        fields
    }

    fn draft_fields(draft: &NewEmployee, _now: DateTime<Utc>) -> Result<FieldMap, ValidationError> {
        draft.validate()?;
        let mut fields = FieldMap::new();
        fields.insert(NAME.into(), Value::from(draft.name.trim()));
        fields.insert(EMAIL.into(), Value::from(draft.email.trim()));
        fields.insert(ROLE.into(), Value::from(draft.role.as_str()));
        fields.insert(DEPARTMENT.into(), Value::from(draft.department.as_str()));
        fields.insert(AVATAR.into(), Value::from(draft.avatar.as_str()));
        fields.insert(PHONE.into(), Value::from(draft.phone.as_str()));
        let status = draft.status.unwrap_or(EmployeeStatus::Active);
        fields.insert(STATUS.into(), Value::from(status.as_str()));
        Ok(fields)
    }

    fn patch_fields(patch: &EmployeePatch) -> Result<FieldMap, ValidationError> {
        patch.validate()?;
        let mut fields = FieldMap::new();
        put_text(&mut fields, NAME, patch.name.as_ref());
        put_text(&mut fields, EMAIL, patch.email.as_ref());
        put_text(&mut fields, ROLE, patch.role.as_ref());
        put_text(&mut fields, DEPARTMENT, patch.department.as_ref());
        put_text(&mut fields, AVATAR, patch.avatar.as_ref());
        put_text(&mut fields, PHONE, patch.phone.as_ref());
        if let Some(status) = patch.status {
            fields.insert(STATUS.into(), Value::from(status.as_str()));
        }
        Ok(fields)
    }
}

impl RecordAdapter<EmployeeRecords> {
    pub fn get_by_department(&self, department: &str) -> AdapterResult<Vec<Employee>> {
        self.query(Operation::Load, vec![Condition::equal(DEPARTMENT, department)])
    }

    pub fn get_by_status(&self, status: EmployeeStatus) -> AdapterResult<Vec<Employee>> {
        self.query(
            Operation::Load,
            vec![Condition::equal(STATUS, status.as_str())],
        )
    }
}
