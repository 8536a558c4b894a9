use dhcp_wire::v6::MessageType;
use dhcp_wire::{IaKind, IdentityAssociation, Message};

/// Read-only view of the client message behind a DHCPv6 exchange.
#[derive(Debug, Clone, Copy)]
pub struct MessageView<'a> {
    message: &'a Message,
    relay_depth: usize,
}

impl<'a> MessageView<'a> {
    /// View over a message that arrived through `relay_depth` envelopes.
    #[must_use]
    pub const fn new(message: &'a Message, relay_depth: usize) -> Self {
        Self {
            message,
            relay_depth,
        }
    }

    /// View over a message that arrived without relay wrapping.
    #[must_use]
    pub const fn direct(message: &'a Message) -> Self {
        Self::new(message, 0)
    }

    /// The underlying message.
    #[must_use]
    pub const fn message(&self) -> &'a Message {
        self.message
    }

    /// Message type of the client message.
    #[must_use]
    pub const fn kind(&self) -> MessageType {
        self.message.msg_type
    }

    /// Number of relay envelopes the message arrived in.
    #[must_use]
    pub const fn relay_depth(&self) -> usize {
        self.relay_depth
    }

    /// `true` when at least one relay envelope was removed.
    #[must_use]
    pub const fn is_relayed(&self) -> bool {
        self.relay_depth > 0
    }

    /// Top-level IAs of `kind`, in message order.
    #[must_use]
    pub fn reservations(&self, kind: IaKind) -> Vec<&'a IdentityAssociation> {
        self.message.options.ias(kind).collect()
    }

    /// Number of top-level IAs of `kind`.
    #[must_use]
    pub fn reservation_count(&self, kind: IaKind) -> usize {
        self.message.options.ias(kind).count()
    }
}
