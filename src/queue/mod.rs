// ShakeMap queue: the local process that actually schedules runs.
//
// The queue listens on 127.0.0.1:<port> and accepts one JSON message per
// connection. The receiver never waits for a reply.

pub mod client;
