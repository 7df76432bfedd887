use anyhow::Result;

/// A message some resource handles, together with its response type.
pub trait Request {
    type Resp;
}

/// Read-only questions.
pub trait Queryable<Req: Request> {
    fn query(&self, req: Req) -> Result<Req::Resp>;
}

/// State-changing instructions.
pub trait Commandable<Req: Request> {
    fn execute(&self, req: Req) -> Result<Req::Resp>;
}
