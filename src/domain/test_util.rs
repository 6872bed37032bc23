use anyhow::anyhow;

/// Whether an in-memory driven port should behave as if its backing service is reachable.
/// Flip it to [Connectivity::Disconnected] to exercise failure paths.
pub enum Connectivity {
    Connected,
    Disconnected,
}

impl Connectivity {
    /// Fails with a communication error while disconnected
    pub fn blow_up_if_disconnected(&self) -> Result<(), anyhow::Error> {
        match self {
            Self::Connected => Ok(()),
            Self::Disconnected => Err(anyhow!("could not connect to service!")),
        }
    }
}

/// Records the arguments of every call made to a faked function and replays a configured
/// return value. Mock driving ports wrap a set of these in a [std::sync::Mutex] so calls can be
/// recorded through `&self`.
///
/// * `Args` is whatever the fake should capture per call, usually a tuple of the interesting arguments
/// * `Ret` is the faked function's return type
///
/// ```ignore
/// struct MockGreeter {
///     greet_result: FakeImplementation<i32, Result<String, GreetError>>,
/// }
///
/// impl Greeter for Mutex<MockGreeter> {
///     async fn greet(&self, user_id: i32) -> Result<String, GreetError> {
///         let mut locked_self = self.lock().unwrap();
///         locked_self.greet_result.save_arguments(user_id);
///
///         locked_self.greet_result.return_value_result()
///     }
/// }
/// ```
pub struct FakeImplementation<Args, Ret> {
    saved_arguments: Vec<Args>,
    return_value: Option<Ret>,
}

impl<Args, Ret> FakeImplementation<Args, Ret> {
    pub fn new() -> FakeImplementation<Args, Ret> {
        FakeImplementation {
            saved_arguments: Vec::new(),
            return_value: None,
        }
    }

    pub fn save_arguments(&mut self, arguments: Args) {
        self.saved_arguments.push(arguments)
    }

    /// Every set of arguments captured so far, oldest first
    pub fn calls(&self) -> &[Args] {
        self.saved_arguments.as_slice()
    }
}

impl<Args, Success, Fail> FakeImplementation<Args, Result<Success, Fail>>
where
    Success: Clone,
    Fail: Clone,
{
    pub fn set_returned_result(&mut self, return_value: Result<Success, Fail>) {
        self.return_value = Some(return_value);
    }

    pub fn return_value_result(&self) -> Result<Success, Fail> {
        match self.return_value {
            Some(ref result) => result.clone(),
            None => panic!("Tried to return from a function where the return value wasn't set!"),
        }
    }
}

impl<Args, Success> FakeImplementation<Args, anyhow::Result<Success>>
where
    Success: Clone,
{
    /// [anyhow::Error] can't be cloned, so errors are replayed as a fresh error carrying the
    /// same message.
    pub fn set_returned_anyhow(&mut self, return_value: anyhow::Result<Success>) {
        self.return_value = Some(return_value);
    }

    pub fn return_value_anyhow(&self) -> anyhow::Result<Success> {
        match self.return_value {
            None => panic!("Tried to return from a function where the value wasn't set!"),
            Some(Ok(ref ok_result)) => Ok(ok_result.clone()),
            Some(Err(ref err)) => Err(anyhow!("{err}")),
        }
    }
}
