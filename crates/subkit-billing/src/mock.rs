//! In-memory gateway that records every call.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use subkit_core::{
    CreateSubscriptionRequest, Error, GatewayProvider, ListPage, ListSubscriptions, Metadata,
    Result, SearchPage, SearchQuery, SearchSubscriptions, StatusFilter, Subscription,
    SubscriptionGateway, SubscriptionItem, SubscriptionStatus, TrialEnd, UpdateSubscription,
    USER_ID_METADATA_KEY,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Create(CreateSubscriptionRequest),
    Retrieve(String),
    List(ListSubscriptions),
    Search(SearchSubscriptions),
    Update(String, UpdateSubscription),
    Cancel(String),
}

pub(crate) fn subscription(
    id: &str,
    customer_id: &str,
    user_id: &str,
    status: SubscriptionStatus,
) -> Subscription {
    Subscription {
        id: id.to_string(),
        customer_id: customer_id.to_string(),
        status,
        cancel_at_period_end: false,
        trial_end: None,
        current_period_start: None,
        current_period_end: None,
        created: None,
        items: vec![SubscriptionItem {
            id: format!("si_{}", id),
            price_id: "price_basic".to_string(),
            quantity: Some(1),
        }],
        metadata: Metadata::from([(USER_ID_METADATA_KEY.to_string(), user_id.to_string())]),
    }
}

#[derive(Default)]
pub(crate) struct MockGateway {
    subscriptions: Mutex<Vec<Subscription>>,
    calls: Mutex<Vec<Call>>,
    failing_id: Mutex<Option<String>>,
    reject_creates: AtomicBool,
}

impl MockGateway {
    pub(crate) fn with(subscriptions: Vec<Subscription>) -> Arc<Self> {
        Arc::new(Self {
            subscriptions: Mutex::new(subscriptions),
            ..Default::default()
        })
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| matches(c)).count()
    }

    /// Updates and cancels of `id` fail with a provider error.
    pub(crate) fn fail_on(&self, id: &str) {
        *self.failing_id.lock().unwrap() = Some(id.to_string());
    }

    pub(crate) fn reject_creates(&self) {
        self.reject_creates.store(true, Ordering::SeqCst);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_failure(&self, id: &str) -> Result<()> {
        if self.failing_id.lock().unwrap().as_deref() == Some(id) {
            return Err(Error::Provider {
                status: 500,
                message: "boom".to_string(),
            });
        }
        Ok(())
    }

    fn modify(&self, id: &str, change: impl FnOnce(&mut Subscription)) -> Result<Subscription> {
        self.check_failure(id)?;
        let mut subscriptions = self.subscriptions.lock().unwrap();
        let subscription = subscriptions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        change(subscription);
        Ok(subscription.clone())
    }
}

#[async_trait]
impl SubscriptionGateway for MockGateway {
    async fn create(&self, request: &CreateSubscriptionRequest) -> Result<Subscription> {
        self.record(Call::Create(request.clone()));
        if self.reject_creates.load(Ordering::SeqCst) {
            return Err(Error::InvalidRequest {
                status: 402,
                code: Some("card_declined".to_string()),
                message: "Your card was declined.".to_string(),
            });
        }

        let mut subscriptions = self.subscriptions.lock().unwrap();
        let id = format!("sub_new{}", subscriptions.len());
        let created = Subscription {
            id: id.clone(),
            customer_id: request.customer_id.clone(),
            status: SubscriptionStatus::Active,
            cancel_at_period_end: false,
            trial_end: match request.trial_end {
                Some(TrialEnd::At(at)) => Some(at),
                _ => None,
            },
            current_period_start: None,
            current_period_end: None,
            created: None,
            items: request
                .price_ids
                .iter()
                .enumerate()
                .map(|(i, price)| SubscriptionItem {
                    id: format!("si_{}_{}", id, i),
                    price_id: price.clone(),
                    quantity: Some(1),
                })
                .collect(),
            metadata: request.metadata.clone(),
        };
        subscriptions.push(created.clone());
        Ok(created)
    }

    async fn retrieve(&self, id: &str) -> Result<Subscription> {
        self.record(Call::Retrieve(id.to_string()));
        self.subscriptions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    async fn list(&self, params: &ListSubscriptions) -> Result<ListPage<Subscription>> {
        self.record(Call::List(params.clone()));
        let subscriptions = self.subscriptions.lock().unwrap();

        let matching: Vec<&Subscription> = subscriptions
            .iter()
            .filter(|s| params.customer_id.as_ref().is_none_or(|c| &s.customer_id == c))
            .filter(|s| match params.status {
                Some(StatusFilter::All) => true,
                Some(StatusFilter::Only(status)) => s.status == status,
                None => s.status != SubscriptionStatus::Canceled,
            })
            .collect();

        let start = match &params.starting_after {
            Some(cursor) => matching
                .iter()
                .position(|s| &s.id == cursor)
                .map_or(matching.len(), |p| p + 1),
            None => 0,
        };
        let end = (start + params.limit as usize).min(matching.len());

        Ok(ListPage {
            data: matching[start..end].iter().map(|s| (*s).clone()).collect(),
            has_more: end < matching.len(),
        })
    }

    async fn search(&self, params: &SearchSubscriptions) -> Result<SearchPage<Subscription>> {
        self.record(Call::Search(params.clone()));
        let data: Vec<Subscription> = self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| {
                s.user_id()
                    .is_some_and(|user| SearchQuery::user_id(user).to_string() == params.query)
            })
            .take(params.limit as usize)
            .cloned()
            .collect();

        Ok(SearchPage {
            data,
            has_more: false,
            next_page: None,
        })
    }

    async fn update(&self, id: &str, request: &UpdateSubscription) -> Result<Subscription> {
        self.record(Call::Update(id.to_string(), request.clone()));
        self.modify(id, |s| {
            if let Some(cancel) = request.cancel_at_period_end {
                s.cancel_at_period_end = cancel;
            }
            match request.trial_end {
                Some(TrialEnd::At(at)) => s.trial_end = Some(at),
                Some(TrialEnd::Now) => s.trial_end = None,
                None => {}
            }
            for item in request.items.iter().flatten() {
                let price = item.price_id.clone().unwrap_or_default();
                match s.items.iter_mut().find(|i| Some(&i.id) == item.id.as_ref()) {
                    Some(existing) => existing.price_id = price,
                    None => s.items.push(SubscriptionItem {
                        id: format!("si_added_{}", price),
                        price_id: price,
                        quantity: item.quantity,
                    }),
                }
            }
        })
    }

    async fn cancel(&self, id: &str) -> Result<Subscription> {
        self.record(Call::Cancel(id.to_string()));
        self.modify(id, |s| s.status = SubscriptionStatus::Canceled)
    }
}

/// Provider that hands out one shared [`MockGateway`] and counts connects.
pub(crate) struct MockProvider {
    gateway: Arc<MockGateway>,
    connects: AtomicUsize,
    delay: Duration,
    fail_next: AtomicBool,
    failed: AtomicUsize,
}

impl MockProvider {
    pub(crate) fn new(gateway: Arc<MockGateway>) -> Arc<Self> {
        Self::with_delay(gateway, Duration::ZERO)
    }

    pub(crate) fn with_delay(gateway: Arc<MockGateway>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            gateway,
            connects: AtomicUsize::new(0),
            delay,
            fail_next: AtomicBool::new(false),
            failed: AtomicUsize::new(0),
        })
    }

    pub(crate) fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_next_connect(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub(crate) fn failed_connects(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GatewayProvider for MockProvider {
    async fn connect(&self) -> Result<Arc<dyn SubscriptionGateway>> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail_next.swap(false, Ordering::SeqCst) {
            self.failed.fetch_add(1, Ordering::SeqCst);
            return Err(Error::Authentication("Invalid API key".to_string()));
        }
        self.connects.fetch_add(1, Ordering::SeqCst);
        let gateway: Arc<dyn SubscriptionGateway> = self.gateway.clone();
        Ok(gateway)
    }
}
