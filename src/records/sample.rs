use super::types::*;
use chrono::{NaiveDate, NaiveDateTime};

/// Everything shown by the record browser
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordSet {
    pub calls: Vec<CallLog>,
    pub reservations: Vec<Reservation>,
    pub orders: Vec<Order>,
    pub complaints: Vec<Complaint>,
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .unwrap_or_default()
}

fn item(name: &str, quantity: u32, price: f64) -> OrderItem {
    OrderItem {
        name: name.to_string(),
        quantity,
        price,
    }
}

impl RecordSet {
    /// No records; live data is not wired up
    pub fn empty() -> Self {
        Self::default()
    }

    /// Demonstration data for a day at the cafe
    pub fn sample() -> Self {
        Self {
            calls: sample_calls(),
            reservations: sample_reservations(),
            orders: sample_orders(),
            complaints: sample_complaints(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
            && self.reservations.is_empty()
            && self.orders.is_empty()
            && self.complaints.is_empty()
    }
}

fn sample_calls() -> Vec<CallLog> {
    vec![
        CallLog {
            id: "call-001".into(),
            timestamp: at(2026, 2, 12, 9, 15),
            duration_secs: 125,
            intent: CallIntent::Reservation,
            summary: "Table for 4 on Feb 14th at 7:00 PM".into(),
            status: CallOutcome::Completed,
            transcript: "Customer: Hi, I'd like to make a reservation.\n\
                Receptionist: Of course! When would you like to dine with us?\n\
                Customer: February 14th at 7 PM for 4 people.\n\
                Receptionist: Perfect! I have you booked for Valentine's Day at 7 PM for a party of 4. May I have your name?\n\
                Customer: Sarah Johnson.\n\
                Receptionist: Great! See you then, Sarah!"
                .into(),
        },
        CallLog {
            id: "call-002".into(),
            timestamp: at(2026, 2, 12, 10, 30),
            duration_secs: 89,
            intent: CallIntent::Order,
            summary: "2 Cappuccinos, 1 Croissant for pickup at 11:00 AM".into(),
            status: CallOutcome::Completed,
            transcript: "Customer: I'd like to place an order for pickup.\n\
                Receptionist: Absolutely! What can I get for you?\n\
                Customer: Two cappuccinos and one almond croissant.\n\
                Receptionist: When would you like to pick it up?\n\
                Customer: In 30 minutes.\n\
                Receptionist: Perfect! Your order will be ready at 11 AM."
                .into(),
        },
        CallLog {
            id: "call-003".into(),
            timestamp: at(2026, 2, 12, 11, 45),
            duration_secs: 245,
            intent: CallIntent::Complaint,
            summary: "Cold food and slow service yesterday".into(),
            status: CallOutcome::Completed,
            transcript: "Customer: I had a terrible experience yesterday.\n\
                Receptionist: I'm so sorry to hear that. Can you tell me what happened?\n\
                Customer: My food arrived cold and the service was incredibly slow.\n\
                Receptionist: That's not the experience we want for our guests. Let me get your details and have our manager reach out to you."
                .into(),
        },
        CallLog {
            id: "call-004".into(),
            timestamp: at(2026, 2, 12, 13, 20),
            duration_secs: 45,
            intent: CallIntent::Inquiry,
            summary: "Asked about gluten-free menu options".into(),
            status: CallOutcome::Completed,
            transcript: "Customer: Do you have gluten-free options?\n\
                Receptionist: Yes! We have several gluten-free items including salads, grilled proteins, and a gluten-free pasta dish.\n\
                Customer: Great, thank you!"
                .into(),
        },
        CallLog {
            id: "call-005".into(),
            timestamp: at(2026, 2, 12, 14, 5),
            duration_secs: 156,
            intent: CallIntent::Reservation,
            summary: "Table for 6 on Feb 15th at 6:30 PM".into(),
            status: CallOutcome::Completed,
            transcript: "Customer: I need a table for 6 tomorrow evening.\n\
                Receptionist: Let me check our availability. How does 6:30 PM sound?\n\
                Customer: That works perfectly.\n\
                Receptionist: Wonderful! May I have your name and phone number?"
                .into(),
        },
    ]
}

fn sample_reservations() -> Vec<Reservation> {
    vec![
        Reservation {
            id: "res-001".into(),
            date_time: at(2026, 2, 14, 19, 0),
            party_size: 4,
            customer_name: "Sarah Johnson".into(),
            phone: "(555) 123-4567".into(),
            notes: "Window seat preferred. Anniversary celebration.".into(),
            status: ReservationStatus::Upcoming,
        },
        Reservation {
            id: "res-002".into(),
            date_time: at(2026, 2, 15, 18, 30),
            party_size: 6,
            customer_name: "Michael Chen".into(),
            phone: "(555) 234-5678".into(),
            notes: "High chair needed for toddler.".into(),
            status: ReservationStatus::Upcoming,
        },
        Reservation {
            id: "res-003".into(),
            date_time: at(2026, 2, 11, 20, 0),
            party_size: 2,
            customer_name: "Emma Williams".into(),
            phone: "(555) 345-6789".into(),
            notes: "Vegetarian options requested.".into(),
            status: ReservationStatus::Past,
        },
        Reservation {
            id: "res-004".into(),
            date_time: at(2026, 2, 13, 19, 30),
            party_size: 8,
            customer_name: "David Martinez".into(),
            phone: "(555) 456-7890".into(),
            notes: "Business dinner. Quiet area preferred.".into(),
            status: ReservationStatus::Cancelled,
        },
    ]
}

fn sample_orders() -> Vec<Order> {
    vec![
        Order {
            id: "order-001".into(),
            order_time: at(2026, 2, 12, 10, 30),
            pickup_time: at(2026, 2, 12, 11, 0),
            customer_name: "Alex Brown".into(),
            phone: "(555) 567-8901".into(),
            items: vec![item("Cappuccino", 2, 4.50), item("Almond Croissant", 1, 3.75)],
            total: 12.75,
            status: OrderStatus::PickedUp,
        },
        Order {
            id: "order-002".into(),
            order_time: at(2026, 2, 12, 12, 15),
            pickup_time: at(2026, 2, 12, 12, 45),
            customer_name: "Lisa Anderson".into(),
            phone: "(555) 678-9012".into(),
            items: vec![
                item("Chicken Caesar Salad", 1, 12.99),
                item("Iced Latte", 1, 5.25),
            ],
            total: 18.24,
            status: OrderStatus::Ready,
        },
        Order {
            id: "order-003".into(),
            order_time: at(2026, 2, 12, 13, 45),
            pickup_time: at(2026, 2, 12, 14, 15),
            customer_name: "Robert Taylor".into(),
            phone: "(555) 789-0123".into(),
            items: vec![item("Espresso", 3, 3.50), item("Chocolate Muffin", 2, 4.25)],
            total: 18.50,
            status: OrderStatus::Pending,
        },
    ]
}

fn sample_complaints() -> Vec<Complaint> {
    vec![
        Complaint {
            id: "comp-001".into(),
            date: at(2026, 2, 12, 11, 45),
            customer_name: "Jennifer Davis".into(),
            phone: "(555) 890-1234".into(),
            issue_summary: "Cold food and slow service".into(),
            details: "Visited on Feb 11th evening. Food arrived cold after 45-minute wait. Server seemed overwhelmed and inattentive.".into(),
            resolution: Resolution::InProgress,
            priority: Priority::High,
        },
        Complaint {
            id: "comp-002".into(),
            date: at(2026, 2, 10, 15, 20),
            customer_name: "Thomas Wilson".into(),
            phone: "(555) 901-2345".into(),
            issue_summary: "Incorrect order received".into(),
            details: "Ordered vegan pasta but received regular pasta with cheese. Had to wait for replacement.".into(),
            resolution: Resolution::Resolved,
            priority: Priority::Medium,
        },
        Complaint {
            id: "comp-003".into(),
            date: at(2026, 2, 9, 9, 30),
            customer_name: "Patricia Moore".into(),
            phone: "(555) 012-3456".into(),
            issue_summary: "Noisy environment during breakfast".into(),
            details: "Music was too loud for morning dining. Requested volume reduction but no change.".into(),
            resolution: Resolution::Unresolved,
            priority: Priority::Low,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_sizes() {
        let records = RecordSet::sample();
        assert_eq!(records.calls.len(), 5);
        assert_eq!(records.reservations.len(), 4);
        assert_eq!(records.orders.len(), 3);
        assert_eq!(records.complaints.len(), 3);
        assert!(RecordSet::empty().is_empty());
    }

    #[test]
    fn test_sample_transcripts_keep_line_breaks() {
        let records = RecordSet::sample();
        let lines: Vec<&str> = records.calls[0].transcript.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "Receptionist: Of course! When would you like to dine with us?");
    }
}
