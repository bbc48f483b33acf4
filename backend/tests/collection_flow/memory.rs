//! In-memory driven ports for exercising the services over HTTP.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cleanbee::domain::ports::{
    CollectionTaskRepository, CollectionTaskRepositoryError, Geocoder, GeocoderError,
    ImpactRepository, ImpactRepositoryError, LeaderboardFilter, NotificationRepository,
    NotificationRepositoryError, ReportRepository, ReportRepositoryError, ReportSubmission,
    RewardLedgerRepository, RewardLedgerRepositoryError, UserPersistenceError, UserRepository,
    VerifiedCollection, WasteClassifier, WasteClassifierError,
};
use cleanbee::domain::{
    CollectionTask, Confidence, Coordinates, EmailAddress, ImpactTotals, LeaderboardEntry,
    Notification,
    Place, PlaceQuery, Report, RewardTransaction, User, UserId, VerificationResult, WasteAmount,
    WasteClassification, WasteImage, WasteType, compute_balance,
};
use pagination::{Page, PageRequest};
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    reports: Vec<Report>,
    tasks: Vec<CollectionTask>,
    ledger: Vec<RewardTransaction>,
    notifications: Vec<Notification>,
}

/// Every repository port backed by one mutex-guarded set of tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    fn with<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> T {
        let mut tables = self.tables.lock().expect("store lock");
        f(&mut tables)
    }

    pub fn task_count(&self) -> usize {
        self.with(|t| t.tasks.len())
    }

    pub fn ledger_rows_for_task(&self, task_id: Uuid) -> usize {
        self.with(|t| {
            t.ledger
                .iter()
                .filter(|row| row.task_id() == Some(task_id))
                .count()
        })
    }
}

fn window<T: Clone>(rows: &[T], request: &PageRequest) -> Vec<T> {
    let offset = usize::try_from(request.offset()).unwrap_or(0);
    let limit = usize::try_from(request.limit()).unwrap_or(0);
    rows.iter().skip(offset).take(limit).cloned().collect()
}

fn matches(haystack: &str, needle: Option<&str>) -> bool {
    needle.is_none_or(|n| haystack.to_lowercase().contains(&n.to_lowercase()))
}

fn newest_first<T>(rows: &mut [T], created_at: impl Fn(&T) -> DateTime<Utc>) {
    rows.sort_by_key(|row| std::cmp::Reverse(created_at(row)));
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.with(|t| t.users.iter().find(|u| u.email() == email).cloned()))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.with(|t| t.users.iter().find(|u| u.id() == id).cloned()))
    }

    async fn create(&self, user: &User) -> Result<(), UserPersistenceError> {
        self.with(|t| {
            if t.users.iter().any(|u| u.email() == user.email()) {
                return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
            }
            t.users.push(user.clone());
            Ok(())
        })
    }
}

#[async_trait]
impl ReportRepository for MemoryStore {
    async fn submit(&self, submission: &ReportSubmission) -> Result<(), ReportRepositoryError> {
        self.with(|t| {
            t.reports.push(submission.report.clone());
            t.tasks.push(submission.task.clone());
            t.ledger.push(submission.reward.clone());
            t.notifications.push(submission.notification.clone());
        });
        Ok(())
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Report>, ReportRepositoryError> {
        let mut reports = self.with(|t| t.reports.clone());
        newest_first(&mut reports, Report::created_at);
        reports.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(reports)
    }
}

#[async_trait]
impl CollectionTaskRepository for MemoryStore {
    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<CollectionTask>, CollectionTaskRepositoryError> {
        Ok(self.with(|t| t.tasks.iter().find(|task| task.id() == id).cloned()))
    }

    async fn list(
        &self,
        request: PageRequest,
        search: Option<String>,
    ) -> Result<Page<CollectionTask>, CollectionTaskRepositoryError> {
        let mut tasks: Vec<CollectionTask> = self.with(|t| {
            t.tasks
                .iter()
                .filter(|task| matches(task.location().as_ref(), search.as_deref()))
                .cloned()
                .collect()
        });
        newest_first(&mut tasks, CollectionTask::created_at);
        let total = tasks.len() as u64;
        Ok(Page::new(window(&tasks, &request), request, total))
    }

    async fn claim(
        &self,
        id: Uuid,
        collector: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Option<CollectionTask>, CollectionTaskRepositoryError> {
        self.with(|t| {
            let Some(slot) = t.tasks.iter_mut().find(|task| task.id() == id) else {
                return Ok(None);
            };
            if slot.collector_id().is_some() {
                return Ok(None);
            }
            let claimed = slot
                .clone()
                .claimed_by(collector.clone(), now)
                .map_err(|err| CollectionTaskRepositoryError::query(err.to_string()))?;
            *slot = claimed.clone();
            Ok(Some(claimed))
        })
    }

    async fn complete_verification(
        &self,
        collection: &VerifiedCollection,
    ) -> Result<Option<CollectionTask>, CollectionTaskRepositoryError> {
        self.with(|t| {
            let Some(slot) = t.tasks.iter_mut().find(|task| task.id() == collection.task_id)
            else {
                return Ok(None);
            };
            if !slot.status().awaits_verification()
                || slot.collector_id() != Some(&collection.collector)
            {
                return Ok(None);
            }
            let verified = slot
                .clone()
                .verified_by(&collection.collector, collection.collected_at)
                .map_err(|err| CollectionTaskRepositoryError::query(err.to_string()))?;
            *slot = verified.clone();
            t.ledger.push(collection.reward.clone());
            t.notifications.push(collection.notification.clone());
            Ok(Some(verified))
        })
    }

    async fn find_reward_for_task(
        &self,
        task_id: Uuid,
    ) -> Result<Option<RewardTransaction>, CollectionTaskRepositoryError> {
        Ok(self.with(|t| {
            t.ledger
                .iter()
                .find(|row| row.task_id() == Some(task_id))
                .cloned()
        }))
    }
}

#[async_trait]
impl RewardLedgerRepository for MemoryStore {
    async fn list_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<RewardTransaction>, RewardLedgerRepositoryError> {
        Ok(self.with(|t| {
            t.ledger
                .iter()
                .filter(|row| row.user_id() == user)
                .cloned()
                .collect()
        }))
    }

    async fn list_recent_for_user(
        &self,
        user: &UserId,
        limit: i64,
    ) -> Result<Vec<RewardTransaction>, RewardLedgerRepositoryError> {
        let mut rows = self.list_for_user(user).await?;
        newest_first(&mut rows, RewardTransaction::created_at);
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(rows)
    }

    async fn redeem(&self, debit: &RewardTransaction) -> Result<(), RewardLedgerRepositoryError> {
        self.with(|t| {
            let available =
                compute_balance(t.ledger.iter().filter(|row| row.user_id() == debit.user_id()));
            if u64::from(debit.amount()) > available {
                return Err(RewardLedgerRepositoryError::insufficient_balance(available));
            }
            t.ledger.push(debit.clone());
            Ok(())
        })
    }

    async fn leaderboard(
        &self,
        request: PageRequest,
        filter: LeaderboardFilter,
    ) -> Result<Page<LeaderboardEntry>, RewardLedgerRepositoryError> {
        let mut standings: Vec<(User, u64)> = self.with(|t| {
            t.users
                .iter()
                .map(|user| {
                    let earned = t
                        .ledger
                        .iter()
                        .filter(|row| row.user_id() == user.id() && row.kind().is_credit())
                        .map(|row| u64::from(row.amount()))
                        .sum();
                    (user.clone(), earned)
                })
                .filter(|(_, earned)| *earned > 0)
                .collect()
        });
        standings.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| a.0.id().as_uuid().cmp(b.0.id().as_uuid()))
        });
        let ranked: Vec<LeaderboardEntry> = standings
            .into_iter()
            .zip(1..)
            .filter(|((user, _), _)| {
                matches(user.display_name().as_ref(), filter.search.as_deref())
                    && filter.user.as_ref().is_none_or(|only| only == user.id())
            })
            .map(|((user, points), rank)| {
                LeaderboardEntry::new(rank, user.id().clone(), user.display_name().clone(), points)
            })
            .collect();
        let total = ranked.len() as u64;
        Ok(Page::new(window(&ranked, &request), request, total))
    }
}

#[async_trait]
impl ImpactRepository for MemoryStore {
    async fn totals(&self) -> Result<ImpactTotals, ImpactRepositoryError> {
        Ok(self.with(|t| ImpactTotals {
            waste_collected: t
                .tasks
                .iter()
                .map(|task| task.amount().leading_quantity())
                .sum(),
            reports_submitted: t.reports.len() as u64,
            tokens_earned: t
                .ledger
                .iter()
                .filter(|row| row.kind().is_credit())
                .map(|row| u64::from(row.amount()))
                .sum(),
        }))
    }
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn list_unread(
        &self,
        user: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let mut rows: Vec<Notification> = self.with(|t| {
            t.notifications
                .iter()
                .filter(|n| &n.user_id == user && !n.is_read)
                .cloned()
                .collect()
        });
        newest_first(&mut rows, |n| n.created_at);
        Ok(rows)
    }

    async fn mark_read(
        &self,
        user: &UserId,
        id: Uuid,
    ) -> Result<bool, NotificationRepositoryError> {
        Ok(self.with(|t| {
            match t
                .notifications
                .iter_mut()
                .find(|n| n.id == id && &n.user_id == user)
            {
                Some(notification) => {
                    notification.is_read = true;
                    true
                }
                None => false,
            }
        }))
    }
}

/// Classifier answering every verification with a fixed result.
pub struct ScriptedClassifier {
    verdict: VerificationResult,
}

impl ScriptedClassifier {
    pub fn new(waste_type_match: bool, quantity_match: bool, confidence: f64) -> Self {
        Self {
            verdict: VerificationResult {
                waste_type_match,
                quantity_match,
                confidence: Confidence::new(confidence).expect("confidence"),
            },
        }
    }
}

#[async_trait]
impl WasteClassifier for ScriptedClassifier {
    async fn classify(
        &self,
        _image: &WasteImage,
    ) -> Result<WasteClassification, WasteClassifierError> {
        Ok(WasteClassification {
            waste_type: WasteType::new("plastic").expect("waste type"),
            quantity: WasteAmount::new("3 bags").expect("amount"),
            confidence: self.verdict.confidence,
        })
    }

    async fn verify(
        &self,
        _image: &WasteImage,
        _waste_type: &WasteType,
        _amount: &WasteAmount,
    ) -> Result<VerificationResult, WasteClassifierError> {
        Ok(self.verdict)
    }
}

/// Geocoder that never resolves a place name.
pub struct SilentGeocoder;

#[async_trait]
impl Geocoder for SilentGeocoder {
    async fn forward(&self, _query: &PlaceQuery) -> Result<Vec<Place>, GeocoderError> {
        Ok(Vec::new())
    }

    async fn reverse(&self, _point: &Coordinates) -> Result<Option<String>, GeocoderError> {
        Err(GeocoderError::timeout("upstream slow"))
    }
}
