use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::domain::{
    Application, ApplicationId, Employee, EmployeeId, NewApplication, NewEmployee, NewPeriod,
    Period, PeriodId, Point, PointDraft, PointId,
};
use super::store::{Collection, EntityStore, PointFilter, StoreError};

#[derive(Default)]
struct Collections {
    employees: Vec<Employee>,
    applications: Vec<Application>,
    points: Vec<Point>,
    periods: Vec<Period>,
}

/// Process-local store backed by insertion-ordered vectors.
#[derive(Default)]
pub struct InMemoryEntityStore {
    collections: RwLock<Collections>,
    sequence: AtomicU64,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self, prefix: &str) -> String {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{prefix}-{id:06}")
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Collections>, StoreError> {
        self.collections
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Collections>, StoreError> {
        self.collections
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

impl EntityStore for InMemoryEntityStore {
    fn insert_employee(&self, employee: NewEmployee) -> Result<Employee, StoreError> {
        let mut guard = self.write()?;
        if guard.employees.iter().any(|e| e.name == employee.name) {
            return Err(StoreError::DuplicateKey {
                collection: Collection::Employees,
                key: employee.name,
            });
        }
        let record = Employee {
            id: EmployeeId(self.next_id("emp")),
            name: employee.name,
            active: employee.active,
        };
        guard.employees.push(record.clone());
        Ok(record)
    }

    fn update_employee(&self, employee: Employee) -> Result<(), StoreError> {
        let mut guard = self.write()?;
        if guard
            .employees
            .iter()
            .any(|e| e.id != employee.id && e.name == employee.name)
        {
            return Err(StoreError::DuplicateKey {
                collection: Collection::Employees,
                key: employee.name,
            });
        }
        let slot = guard
            .employees
            .iter_mut()
            .find(|e| e.id == employee.id)
            .ok_or(StoreError::NotFound(Collection::Employees))?;
        *slot = employee;
        Ok(())
    }

    fn employee_by_name(&self, name: &str) -> Result<Option<Employee>, StoreError> {
        Ok(self
            .read()?
            .employees
            .iter()
            .find(|e| e.name == name)
            .cloned())
    }

    fn employees(&self) -> Result<Vec<Employee>, StoreError> {
        Ok(self.read()?.employees.clone())
    }

    fn insert_application(
        &self,
        application: NewApplication,
    ) -> Result<Application, StoreError> {
        let mut guard = self.write()?;
        if guard.applications.iter().any(|a| a.name == application.name) {
            return Err(StoreError::DuplicateKey {
                collection: Collection::Applications,
                key: application.name,
            });
        }
        let record = Application {
            id: ApplicationId(self.next_id("app")),
            name: application.name,
        };
        guard.applications.push(record.clone());
        Ok(record)
    }

    fn application_by_name(&self, name: &str) -> Result<Option<Application>, StoreError> {
        Ok(self
            .read()?
            .applications
            .iter()
            .find(|a| a.name == name)
            .cloned())
    }

    fn applications(&self) -> Result<Vec<Application>, StoreError> {
        Ok(self.read()?.applications.clone())
    }

    fn remove_application(&self, id: &ApplicationId) -> Result<Application, StoreError> {
        let mut guard = self.write()?;
        let index = guard
            .applications
            .iter()
            .position(|a| &a.id == id)
            .ok_or(StoreError::NotFound(Collection::Applications))?;
        Ok(guard.applications.remove(index))
    }

    fn insert_point(&self, point: PointDraft) -> Result<Point, StoreError> {
        let mut guard = self.write()?;
        let record = Point {
            id: PointId(self.next_id("pt")),
            date_added: point.date_added,
            date_earned: point.date_earned,
            employee: point.employee,
            application: point.application,
            description: point.description,
            prod_env: point.prod_env,
        };
        guard.points.push(record.clone());
        Ok(record)
    }

    fn points(&self, filter: &PointFilter) -> Result<Vec<Point>, StoreError> {
        Ok(self
            .read()?
            .points
            .iter()
            .filter(|point| filter.matches(point))
            .cloned()
            .collect())
    }

    fn count_points(&self, filter: &PointFilter) -> Result<usize, StoreError> {
        Ok(self
            .read()?
            .points
            .iter()
            .filter(|point| filter.matches(point))
            .count())
    }

    fn insert_period(&self, period: NewPeriod) -> Result<Period, StoreError> {
        let mut guard = self.write()?;
        if guard
            .periods
            .iter()
            .any(|p| p.periodname == period.periodname)
        {
            return Err(StoreError::DuplicateKey {
                collection: Collection::Periods,
                key: period.periodname,
            });
        }
        let record = Period {
            id: PeriodId(self.next_id("per")),
            periodname: period.periodname,
            startdate: period.startdate,
            enddate: period.enddate,
            winner: None,
            evaluated: false,
        };
        guard.periods.push(record.clone());
        Ok(record)
    }

    fn period_by_name(&self, name: &str) -> Result<Option<Period>, StoreError> {
        Ok(self
            .read()?
            .periods
            .iter()
            .find(|p| p.periodname == name)
            .cloned())
    }

    fn periods(&self) -> Result<Vec<Period>, StoreError> {
        Ok(self.read()?.periods.clone())
    }

    fn update_period(&self, period: Period) -> Result<(), StoreError> {
        let mut guard = self.write()?;
        let slot = guard
            .periods
            .iter_mut()
            .find(|p| p.id == period.id)
            .ok_or(StoreError::NotFound(Collection::Periods))?;
        *slot = period;
        Ok(())
    }
}
